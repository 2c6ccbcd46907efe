//! 모델 매칭
//!
//! 변형 테이블 → 카탈로그 모델명 순서로, 긴 키부터 검사한다.
//! 1차는 단어 경계 일치, 2차는 단순 포함, 마지막으로 첫 단어 조회.
//! 제조사가 카탈로그에 있으면 모든 단계가 그 제조사의 모델로 한정된다.

use crate::alias::AliasTables;
use crate::catalog::{CatalogIndex, ModelRef};
use crate::text::{contains_word, normalize_model_text};

/// 검사 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// 대소문자 무시, 단어 경계 필요
    WordBoundary,
    /// 대소문자 구분. 2자 이하 영숫자 키는 제외 ("Diesel" 안의 "ES").
    Substring,
}

/// 단순 포함 검사에서 빠지는 짧은 영숫자 키
const SHORT_ASCII_KEY_LEN: usize = 2;

fn is_short_ascii_key(key: &str) -> bool {
    key.len() <= SHORT_ASCII_KEY_LEN && key.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 정규화 텍스트와 원문을 함께 들고 다니는 검색 대상
struct SearchText {
    normalized: String,
    raw: String,
    normalized_upper: String,
    raw_upper: String,
}

impl SearchText {
    fn new(text: &str) -> Self {
        let normalized = normalize_model_text(text);
        Self {
            normalized_upper: normalized.to_uppercase(),
            raw_upper: text.to_uppercase(),
            normalized,
            raw: text.to_string(),
        }
    }

    fn hits(&self, mode: MatchMode, key: &str) -> bool {
        match mode {
            MatchMode::WordBoundary => {
                let key = key.to_uppercase();
                contains_word(&self.normalized_upper, &key) || contains_word(&self.raw_upper, &key)
            }
            MatchMode::Substring => {
                !is_short_ascii_key(key) && (self.normalized.contains(key) || self.raw.contains(key))
            }
        }
    }
}

/// 텍스트에서 카탈로그 모델을 찾는다.
///
/// `manufacturer` 가 카탈로그에 있는 라벨이면 그 제조사 모델만 후보가 된다.
pub fn find_model<'a>(
    index: &'a CatalogIndex,
    aliases: &AliasTables,
    text: &str,
    manufacturer: Option<&str>,
) -> Option<ModelRef<'a>> {
    let scope = manufacturer.filter(|label| index.manufacturer(label).is_some());
    let search = SearchText::new(text);

    for mode in [MatchMode::WordBoundary, MatchMode::Substring] {
        if let Some(found) = match_variations(index, aliases, &search, scope, mode) {
            tracing::debug!(?mode, model = %found.model.model, "모델 변형 테이블로 매칭");
            return Some(found);
        }
        if let Some(found) = match_catalog_names(index, &search, scope, mode) {
            tracing::debug!(?mode, model = %found.model.model, "카탈로그 모델명으로 매칭");
            return Some(found);
        }
    }

    let found = match_first_token(index, aliases, &search.normalized_upper, scope);
    if let Some(found) = found {
        tracing::debug!(model = %found.model.model, "첫 단어로 매칭");
    }
    found
}

fn resolve<'a>(index: &'a CatalogIndex, name: &str, scope: Option<&str>) -> Option<ModelRef<'a>> {
    match scope {
        Some(label) => index.model_of(label, name),
        None => index.first_model_named(name),
    }
}

fn match_variations<'a>(
    index: &'a CatalogIndex,
    aliases: &AliasTables,
    search: &SearchText,
    scope: Option<&str>,
    mode: MatchMode,
) -> Option<ModelRef<'a>> {
    aliases
        .variation_keys_longest_first()
        .iter()
        .filter(|key| search.hits(mode, key))
        .find_map(|key| {
            let canonical = aliases.canonical_model(key)?;
            resolve(index, canonical, scope)
        })
}

fn match_catalog_names<'a>(
    index: &'a CatalogIndex,
    search: &SearchText,
    scope: Option<&str>,
    mode: MatchMode,
) -> Option<ModelRef<'a>> {
    match scope {
        Some(label) => {
            let manufacturer = index.manufacturer(label)?;
            index
                .models_longest_first(label)
                .into_iter()
                .find(|model| search.hits(mode, &model.model))
                .map(|model| ModelRef { manufacturer, model })
        }
        None => index
            .model_names_longest_first()
            .iter()
            .filter(|name| search.hits(mode, name))
            .find_map(|name| index.first_model_named(name)),
    }
}

fn match_first_token<'a>(
    index: &'a CatalogIndex,
    aliases: &AliasTables,
    normalized: &str,
    scope: Option<&str>,
) -> Option<ModelRef<'a>> {
    let first = normalized.split_whitespace().next()?;
    let canonical = aliases.canonical_model(first).unwrap_or(first);
    resolve(index, canonical, scope)
}
