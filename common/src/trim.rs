//! 트림 스코어링
//!
//! 모델의 트림 목록 중 제목에 가장 잘 맞는 트림 하나를 고른다.
//! 각 신호는 독립적으로 가산되며, 가중치의 우선순위는
//! 세대코드 > 연식 범위 > 접두어 > 연료 > 키워드 이다.

use crate::text::{
    ascii_tokens, compact, contains_ascii_word, first_year_range, last_year_range, YearRange,
};
use crate::types::{FuelType, Trim};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref GENERATION_NUMBER_RE: Regex = Regex::new(r"(\d+)\s*세대").unwrap();

    static ref KNOWN_GENERATION_CODES: HashSet<&'static str> = [
        // 현대
        "DN8", "LF", "YF", "NF", "GN7", "IG", "HG", "TG", "CN7", "AD", "MD", "HD",
        "MX5", "TM", "DM", "CM", "NX4", "TL", "LX2", "LX3", "SX2", "OS",
        // 기아
        "DL3", "JF", "TF", "GL3", "YG", "VG", "BD", "YD", "UM", "MQ4", "NQ5", "QL",
        "KA4", "YP", "JA", "TA", "SG2", "DE",
        // 제네시스
        "RG3", "DH", "IK", "RS4", "HI", "JK1", "JX1",
        // 벤츠
        "W214", "W213", "W212", "W206", "W205", "W204", "W223", "W222",
        // BMW
        "G20", "F30", "E90", "G60", "G30", "F10", "G01", "F25", "G05", "F15", "F80",
        // 아우디
        "B9", "B8", "B7", "C8", "C7", "FY", "8R",
    ]
    .into_iter()
    .collect();

    /// 모델명과 겹치는 토큰은 세대코드로 보지 않는다
    static ref MODEL_NAME_TOKENS: HashSet<&'static str> = [
        "K3", "K5", "K7", "K8", "K9", "Q3", "Q5", "Q7", "X1", "X3", "X5", "X7",
        "M3", "M5", "G70", "G80", "G90", "A4", "A6", "A8", "XM3", "QM6", "SM6", "ES",
    ]
    .into_iter()
    .collect();
}

/// 세대코드 → 그 세대 트림명에 쓰이는 문구
const GENERATION_PHRASES: &[(&str, &str)] = &[
    ("DL3", "3세대"),
    ("JF", "2세대"),
    ("TF", "1세대"),
    ("MQ4", "4세대"),
    ("NQ5", "5세대"),
    ("KA4", "4세대"),
    ("GN7", "디 올 뉴 그랜저"),
    ("MX5", "디 올 뉴 싼타페"),
    ("NX4", "디 올 뉴 투싼"),
    ("SG2", "디 올 뉴 니로"),
    ("LX3", "디 올 뉴 팰리세이드"),
];

const MODIFIER_PREFIXES: &[&str] = &["더 뉴", "신형", "올 뉴", "THE NEW", "ALL NEW"];

/// 단일 문자처럼 짧아서 경계 검사가 필요한 키워드 (N 라인 등)
const SHORT_KEYWORDS: &[&str] = &["N"];

/// 트림 스코어 가중치
///
/// 기본값이 의도한 우선순위: 세대코드(20) > 연식 범위(15) > 접두어(10) > 연료(5) > 키워드(3)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// 제목과 트림의 세대코드 일치
    pub generation_code: i32,
    /// 제목 세대코드가 가리키는 문구가 트림명에 있음
    pub generation_keyword: i32,
    pub year_in_range: i32,
    pub year_exact_start: i32,
    pub year_near: i32,
    /// year_near 가 적용되는 시작 연도와의 차이
    pub year_near_tolerance: u32,
    pub prefix_match: i32,
    pub prefix_title_only: i32,
    pub prefix_trim_only: i32,
    /// "N세대" 와 트림의 세대 순번 일치
    pub generation_number: i32,
    pub fuel_match: i32,
    pub fuel_mismatch: i32,
    /// 연료 힌트가 없을 때 하이브리드・전기 트림 감점
    pub specialty_without_hint: i32,
    pub keyword_match: i32,
    pub keyword_missing: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            generation_code: 20,
            generation_keyword: 18,
            year_in_range: 15,
            year_exact_start: 10,
            year_near: 5,
            year_near_tolerance: 2,
            prefix_match: 10,
            prefix_title_only: -3,
            prefix_trim_only: -1,
            generation_number: 8,
            fuel_match: 5,
            fuel_mismatch: -3,
            specialty_without_hint: -2,
            keyword_match: 3,
            keyword_missing: -2,
        }
    }
}

/// 제목에서 한 번만 뽑아 두는 신호
#[derive(Debug, Clone, Default)]
pub struct TitleSignals {
    pub generation_code: Option<String>,
    pub year_range: Option<YearRange>,
    compact_title: String,
    pub generation_number: Option<u32>,
    pub fuel_hint: Option<FuelType>,
    raw: String,
}

impl TitleSignals {
    pub fn from_title(title: &str, fuel_hint: Option<FuelType>) -> Self {
        Self {
            generation_code: generation_code(title),
            year_range: last_year_range(title),
            compact_title: compact(title),
            generation_number: GENERATION_NUMBER_RE
                .captures(title)
                .and_then(|c| c[1].parse().ok()),
            fuel_hint,
            raw: title.to_string(),
        }
    }
}

/// 텍스트 안의 첫 번째 알려진 세대코드
pub fn generation_code(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    ascii_tokens(&upper)
        .into_iter()
        .find(|token| KNOWN_GENERATION_CODES.contains(*token) && !MODEL_NAME_TOKENS.contains(*token))
        .map(str::to_string)
}

/// 하이브리드・전기・플러그인 계열 트림인지
pub fn is_specialty_trim(name: &str) -> bool {
    name.contains("하이브리드")
        || name.contains("일렉트릭")
        || name.contains("전기")
        || name.contains("플러그인")
        || name.contains("전동화")
        || contains_ascii_word(name, "HEV")
        || contains_ascii_word(name, "PHEV")
        || contains_ascii_word(name, "EV")
}

fn trim_mentions_fuel(name: &str, fuel: FuelType) -> bool {
    match fuel {
        FuelType::Hybrid => {
            name.contains("하이브리드") || name.contains("(H)") || contains_ascii_word(name, "HEV")
        }
        FuelType::PlugInHybrid => name.contains("플러그인") || contains_ascii_word(name, "PHEV"),
        FuelType::Electric => {
            name.contains("일렉트릭")
                || name.contains("전기")
                || name.contains("전동화")
                || contains_ascii_word(name, "EV")
        }
        other => name.contains(other.as_str()),
    }
}

/// 트림 하나의 점수
///
/// `trim_generation` 은 비특수 트림 목록에서 역순 위치로 추정한 세대 번호.
pub fn score_trim(
    trim: &Trim,
    signals: &TitleSignals,
    trim_generation: Option<u32>,
    weights: &ScoreWeights,
) -> i32 {
    let name = trim.trim.as_str();
    let mut score = 0;

    // 세대코드
    if let Some(title_code) = &signals.generation_code {
        if generation_code(name).as_deref() == Some(title_code.as_str()) {
            score += weights.generation_code;
        } else if let Some((_, phrase)) = GENERATION_PHRASES.iter().find(|(c, _)| *c == title_code.as_str()) {
            if compact(name).contains(&compact(phrase)) {
                score += weights.generation_keyword;
            }
        }
    }

    // 연식
    if let (Some(title_range), Some(trim_range)) = (signals.year_range, first_year_range(name)) {
        score += year_score(title_range.start, &trim_range, weights);
    }

    // 접두어
    let compact_name = compact(name);
    let mut prefix_matched = false;
    for prefix in MODIFIER_PREFIXES {
        let prefix = compact(prefix);
        let in_title = signals.compact_title.contains(&prefix);
        let in_trim = compact_name.contains(&prefix);
        match (in_title, in_trim) {
            (true, true) => {
                score += weights.prefix_match;
                prefix_matched = true;
            }
            (true, false) => score += weights.prefix_title_only,
            (false, true) => score += weights.prefix_trim_only,
            (false, false) => {}
        }
    }

    // 세대 번호 ("4세대")
    if !prefix_matched {
        if let (Some(wanted), Some(actual)) = (signals.generation_number, trim_generation) {
            if wanted == actual {
                score += weights.generation_number;
            }
        }
    }

    // 연료
    match signals.fuel_hint {
        Some(fuel) if trim_mentions_fuel(name, fuel) => score += weights.fuel_match,
        Some(_) => score += weights.fuel_mismatch,
        None if is_specialty_trim(name) => score += weights.specialty_without_hint,
        None => {}
    }

    // 짧은 키워드
    for keyword in SHORT_KEYWORDS {
        let in_title = contains_ascii_word(&signals.raw, keyword);
        let in_trim = contains_ascii_word(name, keyword);
        if in_title && in_trim {
            score += weights.keyword_match;
        } else if in_title {
            score += weights.keyword_missing;
        }
    }

    score
}

fn year_score(title_year: u32, trim_range: &YearRange, weights: &ScoreWeights) -> i32 {
    if trim_range.contains(title_year) == Some(true) {
        weights.year_in_range
    } else if title_year == trim_range.start {
        weights.year_exact_start
    } else if title_year.abs_diff(trim_range.start) <= weights.year_near_tolerance {
        weights.year_near
    } else {
        0
    }
}

/// 트림 목록에서 가장 점수가 높은 트림. 동점이면 먼저 나온 트림.
///
/// 모든 트림이 음수면 첫 트림을 돌려준다. 빈 목록만 None.
pub fn find_best_trim<'a>(
    trims: &'a [Trim],
    title: &str,
    fuel_hint: Option<FuelType>,
    weights: &ScoreWeights,
) -> Option<&'a Trim> {
    let first = trims.first()?;
    let signals = TitleSignals::from_title(title, fuel_hint);

    // 트림 목록은 최신 세대부터 나열되어 있으므로 역순 위치가 세대 번호
    let regular = trims.iter().filter(|t| !is_specialty_trim(&t.trim)).count();
    let mut regular_seen = 0;

    let mut best: Option<(&Trim, i32)> = None;
    for trim in trims {
        let generation = if is_specialty_trim(&trim.trim) {
            None
        } else {
            regular_seen += 1;
            u32::try_from(regular - regular_seen + 1).ok()
        };
        let score = score_trim(trim, &signals, generation, weights);
        tracing::trace!(trim = %trim.trim, score, "트림 점수");
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((trim, score));
        }
    }

    match best {
        Some((trim, score)) if score >= 0 => Some(trim),
        _ => Some(first),
    }
}
