//! 카탈로그와 파싱 결과의 타입 정의
//!
//! - Catalog / Manufacturer / Model / Trim: 제조사 → 모델 → 트림 계층 마스터
//! - MatchResult: 카탈로그 매칭 단계의 중간 결과
//! - ParsedRecord: 제목 한 건을 파싱한 최종 결과

use serde::{Deserialize, Serialize};
use std::fmt;

/// 카탈로그 문서 전체 (국산 / 수입 두 목록)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub domestic: Vec<Manufacturer>,
    #[serde(default, rename = "import")]
    pub imported: Vec<Manufacturer>,
}

impl Catalog {
    /// 국산 → 수입 순으로 모든 제조사를 순회
    pub fn manufacturers(&self) -> impl Iterator<Item = &Manufacturer> {
        self.domestic.iter().chain(self.imported.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.domestic.is_empty() && self.imported.is_empty()
    }
}

/// 제조사
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: String,
    pub label: String,
    /// 국산/수입 구분 (참고용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub models: Vec<Model>,
}

/// 모델
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    /// 표시용 모델명
    pub model: String,
    #[serde(default)]
    pub trims: Vec<Trim>,
}

/// 트림. 이름에 연식 범위 "(16년~현재)" 나 세대 코드 "B8" 이 들어가는 경우가 많다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trim {
    pub id: String,
    pub trim: String,
}

/// 카탈로그 매칭 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub manufacturer_id: Option<String>,
    pub manufacturer_name: Option<String>,
    pub model_id: Option<String>,
    pub model_name: Option<String>,
    pub trim_id: Option<String>,
    pub trim_name: Option<String>,
}

/// 제목 파싱 결과
///
/// 모든 필드는 독립적으로 비어 있을 수 있다.
/// `*_id` 필드는 카탈로그 매칭으로만 채워진다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub manufacturer_id: Option<String>,
    pub model_id: Option<String>,
    pub trim_id: Option<String>,

    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub sub_model: Option<String>,
    pub trim: Option<String>,
    pub engine_cc: Option<u32>,
    pub fuel_type: Option<FuelType>,
}

impl ParsedRecord {
    /// 모든 필드가 비어 있는지
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 연료 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "가솔린")]
    Gasoline,
    #[serde(rename = "디젤")]
    Diesel,
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "전기")]
    Electric,
    #[serde(rename = "하이브리드")]
    Hybrid,
    #[serde(rename = "플러그인하이브리드")]
    PlugInHybrid,
    #[serde(rename = "수소")]
    Hydrogen,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "가솔린",
            FuelType::Diesel => "디젤",
            FuelType::Lpg => "LPG",
            FuelType::Electric => "전기",
            FuelType::Hybrid => "하이브리드",
            FuelType::PlugInHybrid => "플러그인하이브리드",
            FuelType::Hydrogen => "수소",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 차량 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageType {
    #[serde(rename = "자가용")]
    Private,
    #[serde(rename = "렌터카")]
    Rental,
    #[serde(rename = "영업용")]
    Commercial,
    #[serde(rename = "관용")]
    Government,
}

impl UsageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageType::Private => "자가용",
            UsageType::Rental => "렌터카",
            UsageType::Commercial => "영업용",
            UsageType::Government => "관용",
        }
    }
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 변속기. 알 수 없는 표기는 원문 그대로 보존한다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transmission {
    Automatic,
    Manual,
    Other(String),
}

impl Transmission {
    pub fn as_str(&self) -> &str {
        match self {
            Transmission::Automatic => "자동",
            Transmission::Manual => "수동",
            Transmission::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Transmission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Transmission {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "자동" => Transmission::Automatic,
            "수동" => Transmission::Manual,
            _ => Transmission::Other(raw),
        })
    }
}
