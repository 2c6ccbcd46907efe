//! 경매 CSV 소스 폴더 스캔과 영업일 계산
//!
//! 소스 파일명은 `auction_data_YYMMDD.csv` 고정.

use crate::error::{AuctionError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FILE_PREFIX: &str = "auction_data_";
const FILE_EXTENSION: &str = ".csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// YYMMDD
    pub date: String,
    pub path: PathBuf,
}

/// 파일명에서 YYMMDD 추출
pub fn date_from_filename(name: &str) -> Option<&str> {
    let date = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXTENSION)?;
    parse_yymmdd(date).ok().map(|_| date)
}

pub fn source_filename(date: &str) -> String {
    format!("{}{}{}", FILE_PREFIX, date, FILE_EXTENSION)
}

/// 소스 파일 목록 (최신 날짜 먼저)
pub fn list_sources(dir: &Path) -> Result<Vec<SourceFile>> {
    if !dir.is_dir() {
        return Err(AuctionError::FolderNotFound(dir.display().to_string()));
    }

    let mut sources: Vec<SourceFile> = WalkDir::new(dir)
        .max_depth(1) // 하위 폴더는 보지 않음
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy();
            let date = date_from_filename(&name)?.to_string();
            Some(SourceFile {
                date,
                path: e.path().to_path_buf(),
            })
        })
        .collect();

    sources.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(sources)
}

/// 날짜에 해당하는 소스 파일
pub fn resolve_source(dir: &Path, date: &str) -> Result<PathBuf> {
    parse_yymmdd(date)?;
    let path = dir.join(source_filename(date));
    if path.is_file() {
        Ok(path)
    } else {
        Err(AuctionError::FileNotFound(path.display().to_string()))
    }
}

/// 경매일의 소스 파일. 그날 파일이 없으면 `previous_source_candidates` 순서로 찾는다.
pub fn resolve_auction_source(dir: &Path, auction_date: &str) -> Result<SourceFile> {
    let missing = match resolve_source(dir, auction_date) {
        Ok(path) => {
            return Ok(SourceFile {
                date: auction_date.to_string(),
                path,
            })
        }
        Err(e) => e,
    };

    for candidate in previous_source_candidates(auction_date)? {
        let path = dir.join(source_filename(&candidate));
        if path.is_file() {
            tracing::debug!(auction_date, source = %candidate, "이전 영업일 소스 사용");
            return Ok(SourceFile { date: candidate, path });
        }
    }
    Err(missing)
}

pub fn parse_yymmdd(date: &str) -> Result<NaiveDate> {
    if date.len() != 6 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AuctionError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(&format!("20{}", date), "%Y%m%d")
        .map_err(|_| AuctionError::InvalidDate(date.to_string()))
}

fn format_yymmdd(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// 다음 영업일. 금・토・일은 다음 월요일.
pub fn next_business_day(date: &str) -> Result<String> {
    let day = parse_yymmdd(date)?;
    let days = match day.weekday() {
        Weekday::Fri => 3,
        Weekday::Sat => 2,
        _ => 1,
    };
    Ok(format_yymmdd(day + Duration::days(days)))
}

/// 이 날짜의 경매 데이터가 수집됐을 수 있는 이전 날짜 (가까운 순).
/// 화~금은 전날, 월・토・일은 주말을 건너 사흘치.
pub fn previous_source_candidates(date: &str) -> Result<Vec<String>> {
    let day = parse_yymmdd(date)?;
    let span = match day.weekday() {
        Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => 1,
        _ => 3,
    };
    Ok((1..=span)
        .map(|back| format_yymmdd(day - Duration::days(back)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-11 은 월요일
    #[test]
    fn test_next_business_day() {
        assert_eq!(next_business_day("240311").unwrap(), "240312"); // 월 → 화
        assert_eq!(next_business_day("240314").unwrap(), "240315"); // 목 → 금
        assert_eq!(next_business_day("240315").unwrap(), "240318"); // 금 → 월
        assert_eq!(next_business_day("240316").unwrap(), "240318"); // 토 → 월
        assert_eq!(next_business_day("240317").unwrap(), "240318"); // 일 → 월
    }

    #[test]
    fn test_next_business_day_crosses_year() {
        // 2021-12-31 금요일
        assert_eq!(next_business_day("211231").unwrap(), "220103");
    }

    #[test]
    fn test_previous_source_candidates() {
        assert_eq!(previous_source_candidates("240312").unwrap(), vec!["240311"]);
        assert_eq!(previous_source_candidates("240315").unwrap(), vec!["240314"]);
        assert_eq!(
            previous_source_candidates("240311").unwrap(),
            vec!["240310", "240309", "240308"]
        );
        assert_eq!(
            previous_source_candidates("240316").unwrap(),
            vec!["240315", "240314", "240313"]
        );
    }

    #[test]
    fn test_invalid_dates() {
        assert!(matches!(parse_yymmdd("2403"), Err(AuctionError::InvalidDate(_))));
        assert!(matches!(parse_yymmdd("241332"), Err(AuctionError::InvalidDate(_))));
        assert!(matches!(parse_yymmdd("24-3-1"), Err(AuctionError::InvalidDate(_))));
        assert!(next_business_day("abcdef").is_err());
    }

    #[test]
    fn test_date_from_filename() {
        assert_eq!(date_from_filename("auction_data_240315.csv"), Some("240315"));
        assert_eq!(date_from_filename("auction_data_240399.csv"), None);
        assert_eq!(date_from_filename("auction_data_240315.json"), None);
        assert_eq!(date_from_filename("other_240315.csv"), None);
    }
}
