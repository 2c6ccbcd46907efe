//! CSV 변환 통합 테스트

use car_auction_common::{CatalogStore, FuelType, UsageType};
use car_auction_rust::{ingest, sources};
use tempfile::tempdir;

const SAMPLE_CSV: &str = "\u{FEFF}Post Title,title,sell_number,car_number,fuel,trans,score,year,km,price,color\n\
기아 쏘렌토 R (09년~12년) 디젤 2.0 2WD TLX,,1001,12가3456,자가용,오토,A/4,2011,\"154,000\",\"5,300,000\",흰색\n\
현대 쏘나타 디 엣지 (DN8) (23년~현재) 2.0 가솔린,,1002,34나5678,렌터카,오토,B/3,2023,\"12,000\",\"21,000,000\",검정\n\
[캠핑카] 카운티 2.9 디젤 장축,,1003,,자가용,수동,,2015,,,\n\
,,,,,,,,,,\n";

#[test]
fn test_ingest_file_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("auction_data_240315.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let store = CatalogStore::bundled();
    let output = ingest::ingest_file(&store, &path, None, false).unwrap();

    assert_eq!(output.source_filename, "auction_data_240315.csv");
    assert_eq!(output.stats.rows, 3);
    assert_eq!(output.stats.matched_models, 2);
    assert_eq!(output.stats.fallback_only, 1);
    assert_eq!(output.stats.catalog_generation, 1);

    let sorento = &output.records[0];
    assert_eq!(sorento.auction_date, "2024-03-15");
    assert_eq!(sorento.model_id.as_deref(), Some("kia-sorento"));
    assert_eq!(sorento.km, Some(154_000));
    assert_eq!(sorento.usage_type, Some(UsageType::Private));

    let sonata = &output.records[1];
    assert_eq!(sonata.trim_id.as_deref(), Some("hyundai-sonata-01"));
    assert_eq!(sonata.fuel_type, Some(FuelType::Gasoline));
    assert_eq!(sonata.usage_type, Some(UsageType::Rental));

    let county = &output.records[2];
    assert_eq!(county.model_id, None);
    assert_eq!(county.model.as_deref(), Some("카운티"));
    assert_eq!(county.fuel_type, Some(FuelType::Diesel));
}

/// 행 순서는 병렬 처리 후에도 입력 순서
#[test]
fn test_ingest_keeps_row_order() {
    let mut csv = String::from("Post Title,sell_number\n");
    for i in 0..500 {
        csv.push_str(&format!("기아 레이 1.0 디럭스,{}\n", i));
    }

    let store = CatalogStore::bundled();
    let output = ingest::ingest_text(&store, &csv, "240315", "auction_data_240315.csv", false);
    assert_eq!(output.records.len(), 500);
    for (i, record) in output.records.iter().enumerate() {
        assert_eq!(record.sell_number, Some(i as i64));
    }
}

#[test]
fn test_explicit_date_overrides_filename() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.csv");
    std::fs::write(&path, "Post Title\n현대 포터2 2.5 디젤\n").unwrap();

    let store = CatalogStore::bundled();
    let output = ingest::ingest_file(&store, &path, Some("251231"), false).unwrap();
    assert_eq!(output.records[0].auction_date, "2025-12-31");
    assert_eq!(output.records[0].model_id.as_deref(), Some("hyundai-porter2"));
}

#[test]
fn test_write_output_json() {
    let dir = tempdir().unwrap();
    let store = CatalogStore::bundled();
    let output = ingest::ingest_text(&store, "Post Title\n기아 레이 1.0\n", "240315", "a.csv", false);

    let out_path = dir.path().join("out").join("records.json");
    ingest::write_output(&output, &out_path).unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(json["stats"]["rows"], 1);
    assert_eq!(json["records"][0]["model_id"], "kia-ray");
    assert_eq!(json["records"][0]["auction_date"], "2024-03-15");
}

#[test]
fn test_list_and_resolve_sources() {
    let dir = tempdir().unwrap();
    for name in ["auction_data_240311.csv", "auction_data_240315.csv", "auction_data_240312.csv", "notes.txt"] {
        std::fs::write(dir.path().join(name), "Post Title\n").unwrap();
    }
    std::fs::create_dir(dir.path().join("old")).unwrap();
    std::fs::write(dir.path().join("old").join("auction_data_230101.csv"), "").unwrap();

    let files = sources::list_sources(dir.path()).unwrap();
    let dates: Vec<&str> = files.iter().map(|f| f.date.as_str()).collect();
    assert_eq!(dates, vec!["240315", "240312", "240311"]);

    let path = sources::resolve_source(dir.path(), "240312").unwrap();
    assert!(path.ends_with("auction_data_240312.csv"));
}

/// 한글 Windows 에서 내보낸 CP949 CSV
#[test]
fn test_ingest_cp949_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("auction_data_240315.csv");
    // "Post Title\n기아 레이 1.0\n"
    let mut bytes = b"Post Title\n".to_vec();
    bytes.extend_from_slice(b"\xB1\xE2\xBE\xC6 \xB7\xB9\xC0\xCC 1.0\n");
    std::fs::write(&path, bytes).unwrap();

    let store = CatalogStore::bundled();
    let output = ingest::ingest_file(&store, &path, None, false).unwrap();
    assert_eq!(output.records[0].raw_post_title.as_deref(), Some("기아 레이 1.0"));
    assert_eq!(output.records[0].model_id.as_deref(), Some("kia-ray"));
}

/// 월요일 경매는 그날 파일이 없으면 주말을 건너 금요일 수집분을 쓴다
#[test]
fn test_resolve_auction_source_falls_back_to_previous_business_day() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("auction_data_240308.csv"), "Post Title\n").unwrap();

    // 2024-03-11 월요일
    let source = sources::resolve_auction_source(dir.path(), "240311").unwrap();
    assert_eq!(source.date, "240308");
    assert!(source.path.ends_with("auction_data_240308.csv"));

    std::fs::write(dir.path().join("auction_data_240311.csv"), "Post Title\n").unwrap();
    let source = sources::resolve_auction_source(dir.path(), "240311").unwrap();
    assert_eq!(source.date, "240311");

    // 화요일은 전날만 본다
    let missing = sources::resolve_auction_source(dir.path(), "240313");
    assert!(matches!(missing, Err(car_auction_rust::error::AuctionError::FileNotFound(_))));
}
