//! CSV 행 → 경매 레코드 변환

use crate::csv::CsvRow;
use crate::fields::{
    extract_fuel_type, normalize_fuel, normalize_score, normalize_transmission, normalize_usage_type,
};
use crate::title_parser::TitleParser;
use crate::types::{FuelType, Transmission, UsageType};
use serde::{Deserialize, Serialize};

/// 정규화된 경매 차량 레코드 한 건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRecord {
    pub vin: Option<String>,
    pub car_number: Option<String>,

    /// YYYY-MM-DD
    pub auction_date: String,
    pub sell_number: Option<i64>,
    pub auction_house: Option<String>,

    pub manufacturer_id: Option<String>,
    pub model_id: Option<String>,
    pub trim_id: Option<String>,

    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub sub_model: Option<String>,
    pub trim: Option<String>,
    pub year: Option<i64>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub engine_cc: Option<u32>,
    pub usage_type: Option<UsageType>,

    pub km: Option<i64>,
    pub price: Option<i64>,
    pub score: Option<String>,
    pub color: Option<String>,
    pub image_url: Option<String>,

    pub raw_post_title: Option<String>,
    pub raw_title: Option<String>,
    pub raw_color: Option<String>,
    pub raw_fuel: Option<String>,
    pub raw_trans: Option<String>,
    pub raw_score: Option<String>,

    pub source_filename: String,
}

impl AuctionRecord {
    /// `date` 는 파일명의 YYMMDD
    pub fn from_row(row: &CsvRow, date: &str, filename: &str, parser: &TitleParser<'_>) -> Self {
        let raw_post_title = row.get("Post Title").trim();
        let raw_title = row.get("title").trim();
        let raw_color = row.get("color").trim();
        let raw_fuel = row.get("fuel").trim();
        let raw_trans = row.get("trans").trim();
        let raw_score = row.get("score").trim();

        let headline = if raw_post_title.is_empty() { raw_title } else { raw_post_title };
        let parsed = parser.parse(Some(headline));

        // 제목 → fuel 컬럼 → title 컬럼 순
        let fuel_type = parsed
            .fuel_type
            .or_else(|| normalize_fuel(raw_fuel))
            .or_else(|| non_empty(raw_title).and_then(extract_fuel_type));

        Self {
            vin: non_empty(row.get("vin").trim()).map(str::to_string),
            car_number: non_empty(row.get("car_number").trim()).map(str::to_string),
            auction_date: auction_date(date),
            sell_number: parse_int(row.get("sell_number")),
            auction_house: non_empty(row.get("auction_name").trim()).map(str::to_string),

            manufacturer_id: parsed.manufacturer_id,
            model_id: parsed.model_id,
            trim_id: parsed.trim_id,
            manufacturer: parsed.manufacturer,
            model: parsed.model,
            sub_model: parsed.sub_model,
            trim: parsed.trim,
            year: parse_int(row.get("year")),
            fuel_type,
            transmission: normalize_transmission(raw_trans),
            engine_cc: parsed.engine_cc,
            usage_type: normalize_usage_type(raw_fuel),

            km: parse_int(row.get("km")),
            price: parse_int(row.get("price")),
            score: normalize_score(raw_score),
            color: non_empty(raw_color).map(str::to_string),
            image_url: non_empty(row.get("image").trim()).map(str::to_string),

            raw_post_title: non_empty(raw_post_title).map(str::to_string),
            raw_title: non_empty(raw_title).map(str::to_string),
            raw_color: non_empty(raw_color).map(str::to_string),
            raw_fuel: non_empty(raw_fuel).map(str::to_string),
            raw_trans: non_empty(raw_trans).map(str::to_string),
            raw_score: non_empty(raw_score).map(str::to_string),

            source_filename: filename.to_string(),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// "12,345" → 12345. 숫자가 아니면 None.
pub fn parse_int(raw: &str) -> Option<i64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse().ok()
}

/// "240315" → "2024-03-15". 형식이 다르면 그대로.
pub fn auction_date(yymmdd: &str) -> String {
    if yymmdd.len() == 6 && yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        format!("20{}-{}-{}", &yymmdd[..2], &yymmdd[2..4], &yymmdd[4..])
    } else {
        yymmdd.to_string()
    }
}
