//! 제목 파서
//!
//! 카탈로그 매칭 (제조사 → 모델 → 트림) 결과에
//! 정규식 기반 추출 (배기량・연료・세대코드) 과 첫 단어 폴백을 합쳐
//! `ParsedRecord` 하나를 만든다.
//!
//! `*_id` 는 카탈로그 매칭으로만 채운다. 폴백은 이름 필드만 채운다.

use crate::alias::AliasTables;
use crate::catalog::CatalogIndex;
use crate::fields::{extract_fuel_type, strip_fuel_keywords, trim_fuel_hint};
use crate::manufacturer::extract_manufacturer;
use crate::model_matcher::find_model;
use crate::text::{collapse_whitespace, strip_model_prefixes, strip_year_ranges};
use crate::trim::{find_best_trim, generation_code, ScoreWeights};
use crate::types::{MatchResult, ParsedRecord};
use regex::Regex;

lazy_static::lazy_static! {
    static ref ENGINE_CC_RE: Regex = Regex::new(r"(?i)(\d{3,4})\s*cc").unwrap();
    /// "2.0", "2.0T", "1.2톤" (톤수는 배기량이 아니므로 건너뜀)
    static ref DISPLACEMENT_RE: Regex = Regex::new(r"(\d\.\d)(\s*톤)?").unwrap();
    static ref DISPLACEMENT_STRIP_RE: Regex = Regex::new(r"\d\.\d\s*(?:터보|T)?").unwrap();

    /// 세부 모델 코드 패턴 (앞쪽 우선)
    static ref SUB_MODEL_RES: Vec<Regex> = [
        r"\(([A-Z]{1,3}\d{1,3})\)", // (DN8), (CN7)
        r"\(([A-Z]\d[A-Z])\)",      // (G8T)
        r"([A-Z]\d{3})",            // W213
        r"\(([A-Z]{2,3}\d)\)",      // (MQ4)
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// 폴백 모델명에서 떼어 낼 세대 접미사
    static ref MODEL_SUFFIX_RES: Vec<Regex> = [
        r"\(DM\)", r"\(DN8\)", r"\(CN7\)", r"\(NX4\)", r"\(RG3\)", r"\(G\)", r"MD$", r"R$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// 카탈로그 스냅샷 하나에 묶인 파서
#[derive(Debug, Clone, Copy)]
pub struct TitleParser<'a> {
    index: &'a CatalogIndex,
    aliases: &'a AliasTables,
    weights: &'a ScoreWeights,
}

impl<'a> TitleParser<'a> {
    pub fn new(index: &'a CatalogIndex, aliases: &'a AliasTables, weights: &'a ScoreWeights) -> Self {
        Self {
            index,
            aliases,
            weights,
        }
    }

    /// 카탈로그 기준 ID 매칭
    pub fn match_car_model(&self, title: &str) -> MatchResult {
        let mut result = MatchResult::default();
        if title.trim().is_empty() {
            return result;
        }

        let (label, remaining) = extract_manufacturer(title, self.aliases);
        let label = label.as_deref();

        if let Some(mfr) = label.and_then(|l| self.index.manufacturer(l)) {
            result.manufacturer_id = Some(mfr.id.clone());
            result.manufacturer_name = Some(mfr.label.clone());
        }

        let mut found = find_model(self.index, self.aliases, remaining, label);
        if found.is_none() && label.is_some() {
            // 제조사 토큰을 포함한 원문으로 재시도
            found = find_model(self.index, self.aliases, title, label);
        }

        let Some(found) = found else {
            return result;
        };

        if result.manufacturer_id.is_none() {
            result.manufacturer_id = Some(found.manufacturer.id.clone());
            result.manufacturer_name = Some(found.manufacturer.label.clone());
        }
        result.model_id = Some(found.model.id.clone());
        result.model_name = Some(found.model.model.clone());

        if let Some(trim) = find_best_trim(&found.model.trims, title, trim_fuel_hint(title), self.weights) {
            result.trim_id = Some(trim.id.clone());
            result.trim_name = Some(trim.trim.clone());
        }

        result
    }

    /// 제목 한 건 파싱. 빈 제목이나 None 은 모든 필드가 비어 있는 레코드.
    pub fn parse(&self, title: Option<&str>) -> ParsedRecord {
        let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
            return ParsedRecord::default();
        };

        let matched = self.match_car_model(title);
        let mut record = ParsedRecord {
            manufacturer_id: matched.manufacturer_id,
            model_id: matched.model_id,
            trim_id: matched.trim_id,
            manufacturer: matched.manufacturer_name,
            model: matched.model_name,
            trim: matched.trim_name,
            ..Default::default()
        };

        let (label, remaining) = extract_manufacturer(title, self.aliases);
        if record.manufacturer.is_none() {
            record.manufacturer = label;
        }

        record.engine_cc = extract_engine_cc(title);
        record.fuel_type = extract_fuel_type(title);
        record.sub_model = extract_sub_model(title);

        if record.model.is_none() {
            let (model, trim) = fallback_model_and_trim(remaining, self.aliases);
            tracing::debug!(title, ?model, "카탈로그 미매칭, 첫 단어 폴백 사용");
            record.model = model;
            if record.trim.is_none() {
                record.trim = trim;
            }
        }

        record
    }
}

/// 배기량 (cc). "2000cc" 를 먼저, 다음으로 "2.0" × 1000.
pub fn extract_engine_cc(title: &str) -> Option<u32> {
    if let Some(caps) = ENGINE_CC_RE.captures(title) {
        if let Ok(cc) = caps[1].parse::<u32>() {
            return Some(cc);
        }
    }

    DISPLACEMENT_RE
        .captures_iter(title)
        .filter(|caps| caps.get(2).is_none())
        .find_map(|caps| caps[1].parse::<f64>().ok())
        .map(|liters| (liters * 1000.0).round() as u32)
}

/// 세부 모델・세대 코드 ("DN8", "W213" 등)
pub fn extract_sub_model(title: &str) -> Option<String> {
    SUB_MODEL_RES
        .iter()
        .find_map(|re| re.captures(title).map(|caps| caps[1].to_string()))
        .or_else(|| generation_code(title))
}

/// 카탈로그에서 모델을 못 찾았을 때의 모델명・트림 추정
fn fallback_model_and_trim(remaining: &str, aliases: &AliasTables) -> (Option<String>, Option<String>) {
    if remaining.trim().is_empty() {
        return (None, None);
    }

    // 알려진 변형 표기가 있으면 그 뒤를 트림으로 본다
    for key in aliases.variation_keys_longest_first() {
        let Some(pos) = remaining.find(key.as_str()) else {
            continue;
        };
        let Some(canonical) = aliases.canonical_model(key) else {
            continue;
        };
        let after = &remaining[pos + key.len()..];
        let after = ENGINE_CC_RE.replace_all(&strip_year_ranges(after), "").into_owned();
        let after = collapse_whitespace(&after);
        let trim = (after.chars().count() > 2).then_some(after);
        return (Some(canonical.to_string()), trim);
    }

    let mut text = strip_year_ranges(remaining);
    text = ENGINE_CC_RE.replace_all(&text, "").into_owned();
    text = DISPLACEMENT_STRIP_RE.replace_all(&text, "").into_owned();
    text = strip_fuel_keywords(&text);
    let text = strip_model_prefixes(&collapse_whitespace(&text));

    let (first, rest) = match text.split_once(' ') {
        Some((first, rest)) => (first, rest.trim()),
        None => (text.as_str(), ""),
    };

    let mut model = first.to_string();
    for re in MODEL_SUFFIX_RES.iter() {
        model = re.replace(&model, "").into_owned();
    }
    let model = model.trim();
    let model = aliases.canonical_model(model).unwrap_or(model);

    let model = (!model.is_empty()).then(|| model.to_string());
    let trim = (rest.chars().count() >= 2).then(|| rest.to_string());
    (model, trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Catalog, FuelType};

    struct Fixture {
        index: CatalogIndex,
        aliases: AliasTables,
        weights: ScoreWeights,
    }

    impl Fixture {
        fn bundled() -> Self {
            Self {
                index: CatalogIndex::new(Catalog::bundled()),
                aliases: AliasTables::bundled(),
                weights: ScoreWeights::default(),
            }
        }

        fn parser(&self) -> TitleParser<'_> {
            TitleParser::new(&self.index, &self.aliases, &self.weights)
        }
    }

    #[test]
    fn test_empty_title_is_all_none() {
        let fixture = Fixture::bundled();
        assert!(fixture.parser().parse(None).is_empty());
        assert!(fixture.parser().parse(Some("")).is_empty());
        assert!(fixture.parser().parse(Some("   ")).is_empty());
        assert_eq!(fixture.parser().match_car_model(""), MatchResult::default());
    }

    #[test]
    fn test_bongo_compound_name() {
        let fixture = Fixture::bundled();
        let record = fixture.parser().parse(Some("[기아] 더 뉴봉고Ⅲ화물 1.2톤 LPG 킹캡 초장축 GL"));
        assert_eq!(record.manufacturer.as_deref(), Some("기아"));
        assert_eq!(record.manufacturer_id.as_deref(), Some("kia"));
        assert_eq!(record.model.as_deref(), Some("봉고3"));
        assert_eq!(record.model_id.as_deref(), Some("kia-bongo3"));
        assert_eq!(record.trim.as_deref(), Some("더 뉴 봉고3 트럭 (11년~현재)"));
        assert_eq!(record.fuel_type, Some(FuelType::Lpg));
        assert_eq!(record.engine_cc, None);
    }

    #[test]
    fn test_sorento_r_full_record() {
        let fixture = Fixture::bundled();
        let record = fixture
            .parser()
            .parse(Some("기아 쏘렌토 R (09년~12년) 디젤 2.0 2WD TLX 최고급형"));
        assert_eq!(record.manufacturer_id.as_deref(), Some("kia"));
        assert_eq!(record.model_id.as_deref(), Some("kia-sorento"));
        assert_eq!(record.trim.as_deref(), Some("쏘렌토 R (09년~12년)"));
        assert_eq!(record.engine_cc, Some(2000));
        assert_eq!(record.fuel_type, Some(FuelType::Diesel));
    }

    #[test]
    fn test_sonata_generation_code() {
        let fixture = Fixture::bundled();
        let record = fixture
            .parser()
            .parse(Some("현대 쏘나타 디 엣지(DN8)(23년~현재) LPG 2000cc 비즈니스1(렌터카용)"));
        assert_eq!(record.model_id.as_deref(), Some("hyundai-sonata"));
        assert_eq!(record.trim_id.as_deref(), Some("hyundai-sonata-01"));
        assert_eq!(record.sub_model.as_deref(), Some("DN8"));
        assert_eq!(record.engine_cc, Some(2000));
        assert_eq!(record.fuel_type, Some(FuelType::Lpg));
    }

    #[test]
    fn test_benz_sub_model_code() {
        let fixture = Fixture::bundled();
        let record = fixture
            .parser()
            .parse(Some("벤츠 E-클래스 W213(16년~현재) E200 아방가르드"));
        assert_eq!(record.model_id.as_deref(), Some("benz-e-class"));
        assert_eq!(record.trim_id.as_deref(), Some("benz-e-class-02"));
        assert_eq!(record.sub_model.as_deref(), Some("W213"));
    }

    #[test]
    fn test_xm3_not_m3() {
        let fixture = Fixture::bundled();
        let result = fixture.parser().match_car_model("르노삼성 XM3 1.6 TCe");
        assert_eq!(result.model_name.as_deref(), Some("XM3"));
        assert_eq!(result.manufacturer_id.as_deref(), Some("renault-korea"));
    }

    #[test]
    fn test_bmw_x3() {
        let fixture = Fixture::bundled();
        let result = fixture.parser().match_car_model("BMW X3 2.0");
        assert_eq!(result.model_name.as_deref(), Some("X3"));
    }

    #[test]
    fn test_manufacturer_scoping() {
        let fixture = Fixture::bundled();
        let record = fixture.parser().parse(Some("현대 K5 2.0"));
        assert_eq!(record.manufacturer_id.as_deref(), Some("hyundai"));
        assert_eq!(record.model_id, None);
        assert_eq!(record.trim_id, None);
        // 이름 필드는 폴백으로 채워지지만 id 는 없다
        assert_eq!(record.model.as_deref(), Some("K5"));
    }

    #[test]
    fn test_model_only_title_takes_manufacturer_from_model() {
        let fixture = Fixture::bundled();
        let result = fixture.parser().match_car_model("XM3 1.6 TCe");
        assert_eq!(result.manufacturer_name.as_deref(), Some("르노삼성"));
        assert_eq!(result.model_id.as_deref(), Some("renault-xm3"));
    }

    #[test]
    fn test_genesis_brand_as_model() {
        let fixture = Fixture::bundled();
        let result = fixture.parser().match_car_model("현대 제네시스 G80 3.3 AWD");
        assert_eq!(result.manufacturer_id.as_deref(), Some("genesis"));
        assert_eq!(result.model_id.as_deref(), Some("genesis-g80"));
    }

    #[test]
    fn test_audi_last_year_range() {
        let fixture = Fixture::bundled();
        let result = fixture
            .parser()
            .match_car_model("아우디 A4(05~16년) 2.0 TDI B8 (13년~14년)");
        assert_eq!(result.trim_id.as_deref(), Some("audi-a4-02"));
    }

    #[test]
    fn test_avante_n_keyword() {
        let fixture = Fixture::bundled();
        let result = fixture.parser().match_car_model("현대 아반떼 N (CN7)");
        assert_eq!(result.trim_id.as_deref(), Some("hyundai-avante-01"));
    }

    #[test]
    fn test_fallback_never_invents_ids() {
        let fixture = Fixture::bundled();
        let record = fixture.parser().parse(Some("[캠핑카] 카운티 2.9 디젤 장축"));
        assert_eq!(record.manufacturer.as_deref(), Some("캠핑카"));
        assert_eq!(record.manufacturer_id, None);
        assert_eq!(record.model.as_deref(), Some("카운티"));
        assert_eq!(record.model_id, None);
        assert_eq!(record.trim.as_deref(), Some("장축"));
        assert_eq!(record.engine_cc, Some(2900));
    }

    #[test]
    fn test_english_words_do_not_match_short_model_names() {
        let fixture = Fixture::bundled();
        for title in ["[캠핑카] 카운티 2.9 Diesel 장축", "[특장차] 마이티 EXPRESS 윙바디"] {
            let record = fixture.parser().parse(Some(title));
            assert_eq!(record.manufacturer_id, None, "{}", title);
            assert_eq!(record.model_id, None, "{}", title);
        }
        let record = fixture.parser().parse(Some("[특장차] 마이티 EXPRESS 윙바디"));
        assert_eq!(record.model.as_deref(), Some("마이티"));
    }

    #[test]
    fn test_ev_series_keeps_model_name() {
        let fixture = Fixture::bundled();
        let record = fixture.parser().parse(Some("기아 EV6 롱레인지 2WD 어스"));
        assert_eq!(record.manufacturer.as_deref(), Some("기아"));
        assert_eq!(record.fuel_type, Some(FuelType::Electric));
        assert_eq!(record.model.as_deref(), Some("EV6"));
    }

    #[test]
    fn test_fallback_strips_model_suffix() {
        let fixture = Fixture::bundled();
        let record = fixture.parser().parse(Some("쌍용 코란도C 2.0 디젤"));
        assert_eq!(record.manufacturer.as_deref(), Some("KG모빌리티"));
        assert_eq!(record.model.as_deref(), Some("코란도C"));
        let record = fixture.parser().parse(Some("기아 모하비R 3.0"));
        assert_eq!(record.model.as_deref(), Some("모하비"));
    }

    #[test]
    fn test_empty_catalog_degrades() {
        let index = CatalogIndex::default();
        let aliases = AliasTables::default();
        let weights = ScoreWeights::default();
        let parser = TitleParser::new(&index, &aliases, &weights);
        let record = parser.parse(Some("기아 쏘렌토 R 2.0 디젤"));
        assert_eq!(record.manufacturer_id, None);
        assert_eq!(record.model_id, None);
        assert_eq!(record.trim_id, None);
        assert_eq!(record.engine_cc, Some(2000));
    }

    #[test]
    fn test_deterministic() {
        let fixture = Fixture::bundled();
        let title = "현대 더 뉴 그랜저 IG 2.5 하이브리드 익스클루시브";
        let first = fixture.parser().parse(Some(title));
        let second = fixture.parser().parse(Some(title));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_extract_engine_cc() {
        assert_eq!(extract_engine_cc("쏘나타 1999cc"), Some(1999));
        assert_eq!(extract_engine_cc("싼타페 2.2 디젤"), Some(2200));
        assert_eq!(extract_engine_cc("K5 1.6T"), Some(1600));
        assert_eq!(extract_engine_cc("포터2 1톤"), None);
        assert_eq!(extract_engine_cc("봉고3 1.2톤 2.5 디젤"), Some(2500));
        assert_eq!(extract_engine_cc("레이"), None);
    }

    #[test]
    fn test_extract_sub_model() {
        assert_eq!(extract_sub_model("아반떼(CN7)").as_deref(), Some("CN7"));
        assert_eq!(extract_sub_model("E-클래스 W213 E200").as_deref(), Some("W213"));
        assert_eq!(extract_sub_model("쏘렌토 MQ4 2.5").as_deref(), Some("MQ4"));
        assert_eq!(extract_sub_model("레이 1.0"), None);
    }
}
