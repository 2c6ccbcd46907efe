//! 경매 CSV 읽기
//!
//! 큰따옴표로 감싼 필드 안의 쉼표・줄바꿈・"" 이스케이프를 처리한다.

use std::collections::HashMap;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV 바이트를 문자열로. BOM 은 떼고, UTF-8 이 아니면 CP949 (한글 Windows 내보내기) 로 읽는다.
pub fn decode_csv_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    // encoding_rs 의 EUC-KR 은 CP949 확장 영역까지 포함
    let (text, had_errors) = encoding_rs::EUC_KR.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!("CP949 로도 읽을 수 없는 바이트를 대체 문자로 바꿉니다");
    } else {
        tracing::debug!("UTF-8 이 아니어서 CP949 로 읽었습니다");
    }
    text.into_owned()
}

/// 헤더 이름으로 값을 찾는 CSV 한 행
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// 컬럼 값. 없는 컬럼은 빈 문자열.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// 첫 행을 헤더로 보고 나머지를 `CsvRow` 로. 빈 행은 건너뛴다.
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let mut records = parse_csv_records(text).into_iter();
    let Some(header) = records.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    records
        .filter(|record| record.iter().any(|field| !field.trim().is_empty()))
        .map(|record| {
            CsvRow::from_pairs(
                header
                    .iter()
                    .cloned()
                    .zip(record.into_iter().chain(std::iter::repeat(String::new()))),
            )
        })
        .collect()
}

/// 레코드 단위 분할 (따옴표 안의 줄바꿈은 필드의 일부)
pub fn parse_csv_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBFPost Title,fuel\n";
        assert_eq!(decode_csv_bytes(bytes), "Post Title,fuel\n");
    }

    #[test]
    fn test_decode_cp949_fallback() {
        let bytes = b"Post Title\n\xB1\xE2\xBE\xC6 \xB7\xB9\xC0\xCC\n";
        assert_eq!(decode_csv_bytes(bytes), "Post Title\n기아 레이\n");
    }

    #[test]
    fn test_decode_cp949_extension_area() {
        // "똠" 은 EUC-KR 밖, CP949 확장 영역
        let bytes = b"\x8C\x63\xB9\xE6\xB0\xA2\xC7\xCF";
        assert_eq!(decode_csv_bytes(bytes), "똠방각하");
    }

    #[test]
    fn test_decode_undecodable_is_replaced() {
        let text = decode_csv_bytes(b"title\n\xFF\xFF\n");
        assert!(text.starts_with("title\n"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse_csv_records("a,\"b,c\",\"say \"\"hi\"\"\"\r\n1,2,3\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], vec!["a", "b,c", "say \"hi\""]);
        assert_eq!(records[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_newline_inside_quotes() {
        let records = parse_csv_records("title,km\n\"쏘나타\n2.0\",\"12,000\"");
        assert_eq!(records[1], vec!["쏘나타\n2.0", "12,000"]);
    }

    #[test]
    fn test_parse_csv_rows_by_header() {
        let rows = parse_csv("Post Title, fuel ,km\n기아 레이,가솔린,\"1,234\"\n\n현대 포터2,경유\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Post Title"), "기아 레이");
        assert_eq!(rows[0].get("fuel"), "가솔린");
        assert_eq!(rows[0].get("km"), "1,234");
        // 짧은 행은 빈 값으로 채움
        assert_eq!(rows[1].get("km"), "");
        assert_eq!(rows[1].get("없는 컬럼"), "");
    }

    #[test]
    fn test_parse_csv_empty() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("Post Title,fuel\n").is_empty());
    }
}
