//! CSV 필드 정규화
//!
//! 연료・변속기・용도・평가점수 원문을 정해진 값으로 바꾼다.
//! 모두 상태가 없는 순수 함수이며, 빈 값이나 모르는 값은 None 이다.

use crate::text::{contains_ascii_word, remove_ascii_word};
use crate::types::{FuelType, Transmission, UsageType};

/// 연료 표기 → 연료 종류.
/// 명시적인 연료 단어를 먼저, 엔진 기술 표기 ("터보", "GDI" 등) 는 뒤에 둔다.
const FUEL_ALIASES: &[(&str, FuelType)] = &[
    ("가솔린", FuelType::Gasoline),
    ("휘발유", FuelType::Gasoline),
    ("디젤", FuelType::Diesel),
    ("경유", FuelType::Diesel),
    ("LPG", FuelType::Lpg),
    ("LPI", FuelType::Lpg),
    ("LPe", FuelType::Lpg),
    ("전기", FuelType::Electric),
    ("일렉트릭", FuelType::Electric),
    ("EV", FuelType::Electric),
    ("FCEV", FuelType::Hydrogen),
    ("수소", FuelType::Hydrogen),
    ("(PHEV)", FuelType::PlugInHybrid),
    ("PHEV", FuelType::PlugInHybrid),
    ("플러그인하이브리드", FuelType::PlugInHybrid),
    ("(HEV)", FuelType::Hybrid),
    ("(H)", FuelType::Hybrid),
    ("HEV", FuelType::Hybrid),
    ("하이브리드", FuelType::Hybrid),
    ("가솔린+전기", FuelType::Hybrid),
    ("T-GDI", FuelType::Gasoline),
    ("GDI", FuelType::Gasoline),
    ("GDi", FuelType::Gasoline),
    ("터보", FuelType::Gasoline),
    ("CRDi", FuelType::Diesel),
    ("e-VGT", FuelType::Diesel),
    ("VGT", FuelType::Diesel),
    ("TDI", FuelType::Diesel),
];

const TRANSMISSION_ALIASES: &[(&str, Transmission)] = &[
    ("오토", Transmission::Automatic),
    ("자동", Transmission::Automatic),
    ("A/T", Transmission::Automatic),
    ("AT", Transmission::Automatic),
    ("DCT", Transmission::Automatic),
    ("수동", Transmission::Manual),
    ("M/T", Transmission::Manual),
    ("MT", Transmission::Manual),
];

const USAGE_ALIASES: &[(&str, UsageType)] = &[
    ("자가용", UsageType::Private),
    ("렌터카", UsageType::Rental),
    ("렌트", UsageType::Rental),
    ("렌트카", UsageType::Rental),
    ("영업용", UsageType::Commercial),
    ("관용", UsageType::Government),
];

/// fuel 컬럼 원문 → 연료 종류.
/// 이 컬럼에 용도 ("자가용", "렌터카") 가 들어오는 경우가 있는데, 그때는 None.
pub fn normalize_fuel(raw: &str) -> Option<FuelType> {
    let raw = raw.trim();
    if raw.is_empty() || normalize_usage_type(raw).is_some() {
        return None;
    }

    lookup(FUEL_ALIASES, raw)
        .or_else(|| lookup_ignore_case(FUEL_ALIASES, raw))
        .copied()
}

/// trans 컬럼 원문 → 자동 / 수동 / 원문 그대로
pub fn normalize_transmission(raw: &str) -> Option<Transmission> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(
        lookup(TRANSMISSION_ALIASES, raw)
            .or_else(|| lookup_ignore_case(TRANSMISSION_ALIASES, raw))
            .cloned()
            .unwrap_or_else(|| Transmission::Other(raw.to_string())),
    )
}

/// fuel 컬럼 원문 → 용도
pub fn normalize_usage_type(raw: &str) -> Option<UsageType> {
    lookup(USAGE_ALIASES, raw.trim()).copied()
}

/// 평가점수 "A / 4" → "A4". 공백과 "/" 를 모두 제거한다.
pub fn normalize_score(raw: &str) -> Option<String> {
    let score: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/')
        .collect();
    (!score.is_empty()).then_some(score)
}

/// 제목 키워드에서 연료 추출.
/// 전기・하이브리드 표기는 정확도가 높으므로 별칭 표보다 먼저 확인한다.
pub fn extract_fuel_type(title: &str) -> Option<FuelType> {
    let upper = title.to_uppercase();

    if title.contains("일렉트릭") || upper.contains("ELECTRIC") || mentions_ev(&upper) {
        return Some(FuelType::Electric);
    }
    if contains_ascii_word(&upper, "FCEV") || title.contains("수소") {
        return Some(FuelType::Hydrogen);
    }
    if contains_ascii_word(&upper, "PHEV") || title.contains("플러그인") {
        return Some(FuelType::PlugInHybrid);
    }
    if title.contains("하이브리드")
        || contains_ascii_word(&upper, "HEV")
        || contains_ascii_word(&upper, "HYBRID")
        || title.contains("(H)")
    {
        return Some(FuelType::Hybrid);
    }

    FUEL_ALIASES
        .iter()
        .find(|(keyword, _)| fuel_keyword_in_title(title, keyword))
        .map(|(_, fuel)| *fuel)
}

/// 트림 선택용 연료 힌트. 하이브리드・플러그인・전기 표기만 본다.
pub fn trim_fuel_hint(title: &str) -> Option<FuelType> {
    if title.contains("(PHEV)") || title.contains("플러그인") {
        return Some(FuelType::PlugInHybrid);
    }
    if title.contains("(H)") || title.contains("(HEV)") || title.contains("하이브리드") {
        return Some(FuelType::Hybrid);
    }
    if mentions_ev(title) || title.contains("일렉트릭") || title.contains("전기") {
        return Some(FuelType::Electric);
    }
    None
}

/// "EV" 단독 또는 "EV6", "EV9" 같은 EV 시리즈 모델명.
/// 앞뒤가 다른 영숫자면 제외 ("LEVANTE", "DEV", "EVO").
fn mentions_ev(text: &str) -> bool {
    text.match_indices("EV").any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let rest = text[start + 2..].trim_start_matches(|c: char| c.is_ascii_digit());
        let after = rest.chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric()) && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

/// 제목에서 연료 표기를 걷어낸다. ASCII 표기는 단독으로 쓰인 경우만.
pub(crate) fn strip_fuel_keywords(text: &str) -> String {
    FUEL_ALIASES.iter().fold(text.to_string(), |acc, (keyword, _)| {
        if is_ascii_keyword(keyword) {
            remove_ascii_word(&acc, keyword)
        } else {
            acc.replace(keyword, "")
        }
    })
}

fn is_ascii_keyword(keyword: &str) -> bool {
    keyword.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// ASCII 표기는 다른 영숫자 코드에 붙어 있으면 무시한다 ("LEV" 안의 "EV" 등)
fn fuel_keyword_in_title(title: &str, keyword: &str) -> bool {
    if is_ascii_keyword(keyword) {
        contains_ascii_word(title, keyword)
    } else {
        title.contains(keyword)
    }
}

fn lookup<'a, T>(table: &'a [(&str, T)], raw: &str) -> Option<&'a T> {
    table.iter().find(|(key, _)| *key == raw).map(|(_, value)| value)
}

fn lookup_ignore_case<'a, T>(table: &'a [(&str, T)], raw: &str) -> Option<&'a T> {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(raw))
        .map(|(_, value)| value)
}
