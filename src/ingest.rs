//! 경매 CSV 일괄 변환
//!
//! 파일 하나를 스냅샷 하나로 처리한다. 도중에 카탈로그가 리로드되어도
//! 같은 파일의 레코드는 모두 같은 세대의 카탈로그로 매칭된다.

use crate::error::{AuctionError, Result};
use crate::sources::{date_from_filename, parse_yymmdd};
use car_auction_common::{decode_csv_bytes, parse_csv, AuctionRecord, CatalogStore};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows: usize,
    /// model_id 가 채워진 행
    pub matched_models: usize,
    pub matched_trims: usize,
    /// 카탈로그 밖이라 이름만 채워진 행
    pub fallback_only: usize,
    pub catalog_generation: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutput {
    pub source_filename: String,
    pub stats: IngestStats,
    pub records: Vec<AuctionRecord>,
}

/// CSV 파일 하나를 레코드 목록으로. `date` 가 없으면 파일명에서 읽는다.
pub fn ingest_file(
    store: &CatalogStore,
    path: &Path,
    date: Option<&str>,
    show_progress: bool,
) -> Result<IngestOutput> {
    if !path.is_file() {
        return Err(AuctionError::FileNotFound(path.display().to_string()));
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let date = match date.or_else(|| date_from_filename(&filename)) {
        Some(d) => d.to_string(),
        None => return Err(AuctionError::InvalidDate(filename.clone())),
    };
    parse_yymmdd(&date)?;

    let bytes = std::fs::read(path)?;
    let text = decode_csv_bytes(&bytes);
    Ok(ingest_text(store, &text, &date, &filename, show_progress))
}

/// CSV 본문 변환. 행 단위는 병렬.
pub fn ingest_text(
    store: &CatalogStore,
    text: &str,
    date: &str,
    filename: &str,
    show_progress: bool,
) -> IngestOutput {
    let rows = parse_csv(text);
    let snapshot = store.snapshot();
    let parser = snapshot.parser(store.weights());

    let pb = progress_bar(rows.len() as u64, show_progress);
    let records: Vec<AuctionRecord> = rows
        .par_iter()
        .map(|row| {
            let record = AuctionRecord::from_row(row, date, filename, &parser);
            pb.inc(1);
            record
        })
        .collect();
    pb.finish_and_clear();

    let stats = IngestStats {
        rows: records.len(),
        matched_models: records.iter().filter(|r| r.model_id.is_some()).count(),
        matched_trims: records.iter().filter(|r| r.trim_id.is_some()).count(),
        fallback_only: records
            .iter()
            .filter(|r| r.model_id.is_none() && r.model.is_some())
            .count(),
        catalog_generation: snapshot.generation,
    };
    tracing::info!(
        file = filename,
        rows = stats.rows,
        matched = stats.matched_models,
        generation = stats.catalog_generation,
        "CSV 변환 완료"
    );

    IngestOutput {
        source_filename: filename.to_string(),
        stats,
        records,
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} 행 ({eta})") {
        pb.set_style(style);
    }
    pb
}

pub fn write_output(output: &IngestOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(path, json)?;
    Ok(())
}
