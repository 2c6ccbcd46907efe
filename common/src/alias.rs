//! 별칭 테이블 모듈
//!
//! 제조사 표기 변형과 모델명 변형을 카탈로그의 정식 이름으로 바꾼다.
//! 테이블 본체는 `data/*.json` 에 두고 코드에는 넣지 않는다.

use crate::catalog::sort_longest_first;
use crate::error::Result;
use std::collections::HashMap;

/// 기본 제조사 별칭 (번들)
pub const BUNDLED_MANUFACTURER_ALIASES: &str = include_str!("../data/manufacturer_aliases.json");
/// 기본 모델명 변형 (번들)
pub const BUNDLED_MODEL_VARIATIONS: &str = include_str!("../data/model_variations.json");

/// 제조사 별칭 + 모델명 변형
#[derive(Debug, Clone, Default)]
pub struct AliasTables {
    /// 원문 제조사 표기 → 카탈로그 제조사 라벨
    manufacturers: HashMap<String, String>,
    /// 원문 모델 표기 → 카탈로그 모델명
    model_variations: HashMap<String, String>,
    /// 모델 변형 키 (긴 것부터)
    variation_keys: Vec<String>,
}

impl AliasTables {
    pub fn new(
        manufacturers: HashMap<String, String>,
        model_variations: HashMap<String, String>,
    ) -> Self {
        let mut variation_keys: Vec<String> = model_variations.keys().cloned().collect();
        sort_longest_first(&mut variation_keys);
        Self {
            manufacturers,
            model_variations,
            variation_keys,
        }
    }

    /// 번들된 기본 테이블
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_MANUFACTURER_ALIASES, BUNDLED_MODEL_VARIATIONS) {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!(error = %e, "번들 별칭 테이블을 읽지 못했습니다");
                Self::default()
            }
        }
    }

    /// JSON 문자열 두 개에서 읽기
    pub fn from_json(manufacturers_json: &str, variations_json: &str) -> Result<Self> {
        let manufacturers: HashMap<String, String> = serde_json::from_str(manufacturers_json)?;
        let variations: HashMap<String, String> = serde_json::from_str(variations_json)?;
        Ok(Self::new(manufacturers, variations))
    }

    /// 제조사 표기 → 정식 라벨
    pub fn manufacturer_label(&self, raw: &str) -> Option<&str> {
        self.manufacturers.get(raw).map(String::as_str)
    }

    /// 모델 표기 → 정식 모델명
    pub fn canonical_model(&self, raw: &str) -> Option<&str> {
        self.model_variations.get(raw).map(String::as_str)
    }

    /// 모델 변형 키 (긴 것부터)
    pub fn variation_keys_longest_first(&self) -> &[String] {
        &self.variation_keys
    }

    pub fn manufacturer_alias_count(&self) -> usize {
        self.manufacturers.len()
    }

    pub fn model_variation_count(&self) -> usize {
        self.model_variations.len()
    }

    /// 테이블을 병합 (나중에 추가한 쪽이 우선)
    pub fn merge(&mut self, other: &AliasTables) {
        self.manufacturers.extend(other.manufacturers.clone());
        self.model_variations.extend(other.model_variations.clone());
        let mut keys: Vec<String> = self.model_variations.keys().cloned().collect();
        sort_longest_first(&mut keys);
        self.variation_keys = keys;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_tables_load() {
        let tables = AliasTables::bundled();
        assert_eq!(tables.manufacturer_label("쉐보레(한국GM)"), Some("쉐보레"));
        assert_eq!(tables.manufacturer_label("쌍용"), Some("KG모빌리티"));
        assert_eq!(tables.canonical_model("봉고Ⅲ"), Some("봉고3"));
        assert_eq!(tables.canonical_model("포터 II"), Some("포터2"));
    }

    #[test]
    fn test_variation_keys_longest_first() {
        let tables = AliasTables::bundled();
        let keys = tables.variation_keys_longest_first();
        let long = keys.iter().position(|k| k == "봉고Ⅲ화물").unwrap();
        let short = keys.iter().position(|k| k == "봉고Ⅲ").unwrap();
        assert!(long < short);
    }

    #[test]
    fn test_from_json() {
        let tables = AliasTables::from_json(r#"{"현대자동차": "현대"}"#, r#"{"소나타": "쏘나타"}"#).unwrap();
        assert_eq!(tables.manufacturer_label("현대자동차"), Some("현대"));
        assert_eq!(tables.canonical_model("소나타"), Some("쏘나타"));
        assert_eq!(tables.canonical_model("쏘나타"), None);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base = AliasTables::from_json(r#"{"GM": "쉐보레"}"#, r#"{"포터": "포터2"}"#).unwrap();
        let custom = AliasTables::from_json(r#"{"GM": "GMC"}"#, r#"{"포터 더블캡": "포터2"}"#).unwrap();
        base.merge(&custom);
        assert_eq!(base.manufacturer_label("GM"), Some("GMC"));
        assert_eq!(base.variation_keys_longest_first()[0], "포터 더블캡");
    }
}
