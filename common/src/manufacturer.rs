//! 제목에서 제조사 추출
//!
//! 우선순위:
//! 1. 모델명이 브랜드를 뜻하는 특수 케이스 (제네시스 G 시리즈, 테슬라 모델 X)
//! 2. "[제조사]" 괄호 접두어
//! 3. 첫 단어 (괄호 수식어 포함 표기를 우선)

use crate::alias::AliasTables;
use regex::Regex;

lazy_static::lazy_static! {
    static ref GENESIS_RE: Regex =
        Regex::new(r"(?i)(?:GENESIS|제네시스)\s*(?:G70|G80|G90|GV60|GV70|GV80|EQ900)").unwrap();
    static ref TESLA_RE: Regex = Regex::new(r"(?i)(?:TESLA|테슬라)\s*(?:MODEL|모델)").unwrap();
    static ref BRACKET_RE: Regex = Regex::new(r"^\[([^\]]+)\]\s*").unwrap();
    static ref PAREN_WORD_RE: Regex = Regex::new(r"^([^(]+)(\([^)]+\))?").unwrap();
}

const GENESIS_LABEL: &str = "제네시스";
const TESLA_LABEL: &str = "테슬라";

/// 제조사 라벨과 나머지 텍스트를 돌려준다.
///
/// 특수 케이스에서는 브랜드 토큰이 모델 매칭에 다시 쓰이므로 원문 전체를 돌려준다.
pub fn extract_manufacturer<'t>(title: &'t str, aliases: &AliasTables) -> (Option<String>, &'t str) {
    if GENESIS_RE.is_match(title) {
        return (Some(GENESIS_LABEL.to_string()), title);
    }
    if TESLA_RE.is_match(title) {
        return (Some(TESLA_LABEL.to_string()), title);
    }

    if let Some(caps) = BRACKET_RE.captures(title) {
        let raw = caps.get(1).map_or("", |m| m.as_str()).trim();
        let end = caps.get(0).map_or(0, |m| m.end());
        let label = aliases.manufacturer_label(raw).unwrap_or(raw);
        return (Some(label.to_string()), &title[end..]);
    }

    let trimmed = title.trim_start();
    let (first, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (trimmed, ""),
    };

    if let Some(caps) = PAREN_WORD_RE.captures(first) {
        // "쉐보레(한국GM)" 전체 표기를 먼저, 다음으로 "쉐보레"
        let full = caps.get(0).map_or("", |m| m.as_str());
        if let Some(label) = aliases.manufacturer_label(full) {
            return (Some(label.to_string()), rest);
        }
        let base = caps.get(1).map_or("", |m| m.as_str());
        if let Some(label) = aliases.manufacturer_label(base) {
            return (Some(label.to_string()), rest);
        }
    }

    (None, title)
}
