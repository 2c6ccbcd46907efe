//! Car Auction Common Library
//!
//! 경매 차량 제목을 카탈로그 (제조사 → 모델 → 트림) 에 매칭하는 엔진과
//! CSV 행 정규화. CLI 와 다른 서비스 계층에서 함께 쓴다.

pub mod types;
pub mod error;
pub mod text;
pub mod catalog;
pub mod alias;
pub mod manufacturer;
pub mod model_matcher;
pub mod trim;
pub mod fields;
pub mod title_parser;
pub mod store;
pub mod csv;
pub mod record;

pub use types::{Catalog, FuelType, Manufacturer, MatchResult, Model, ParsedRecord, Transmission, Trim, UsageType};
pub use error::{Error, Result};
pub use catalog::{CatalogIndex, ModelRef};
pub use alias::AliasTables;
pub use manufacturer::extract_manufacturer;
pub use model_matcher::find_model;
pub use trim::{find_best_trim, ScoreWeights};
pub use fields::{normalize_fuel, normalize_score, normalize_transmission, normalize_usage_type};
pub use title_parser::TitleParser;
pub use store::{CatalogSnapshot, CatalogSources, CatalogStore};
pub use csv::{decode_csv_bytes, parse_csv, CsvRow};
pub use record::AuctionRecord;
