//! 제목 텍스트 정규화
//!
//! 모델 검색 전의 접두어・연식・세대코드 제거와
//! 단어 경계 검사를 이 모듈 한 곳에 모아 둔다.

use regex::Regex;

lazy_static::lazy_static! {
    /// 모델명 앞에 붙는 수식어 (세대명 포함)
    static ref MODEL_PREFIX_RES: Vec<Regex> = [
        r"^더\s*뉴\s*",
        r"^더뉴\s*",
        r"^올\s*뉴\s*",
        r"^디\s*올\s*뉴\s*",
        r"^신형\s*",
        r"(?i)^the\s+new\s+",
        r"(?i)^all\s+new\s+",
        r"(?i)^new\s+",
        r"^뉴\s*",
        r"^NF\s+",
        r"^LF\s+",
        r"^YF\s+",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// "(09년~12년)", "(16년~현재)"
    static ref YEAR_RANGE_RE: Regex = Regex::new(r"\((\d{2})년\s*~\s*([^)]*)\)").unwrap();

    /// "(DN8)", "(B8)", "(DM)" 같은 짧은 세대코드 괄호
    static ref GENERATION_PAREN_RE: Regex = Regex::new(r"\((?:[A-Z]{1,3}\d{1,3}|[A-Z]{2})\)").unwrap();

    static ref RANGE_END_RE: Regex = Regex::new(r"(\d{2})").unwrap();

    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 연식 범위 (두 자리 연도)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: u32,
    /// None: "현재" 이거나 해석 불가
    pub end: Option<u32>,
    /// "현재" 로 끝나는 범위
    pub open_ended: bool,
}

impl YearRange {
    /// 연도가 범위 안에 있는지. 끝이 해석되지 않은 범위는 판단하지 않는다.
    pub fn contains(&self, year: u32) -> Option<bool> {
        if self.open_ended {
            return Some(year >= self.start);
        }
        self.end.map(|end| year >= self.start && year <= end)
    }
}

/// 모델 검색용 정규화: 접두어 → 연식 범위 → 세대코드 괄호 순으로 제거
pub fn normalize_model_text(text: &str) -> String {
    let text = strip_model_prefixes(text);
    let text = strip_year_ranges(&text);
    let text = strip_generation_parens(&text);
    collapse_whitespace(&text)
}

/// 선두의 "더 뉴", "올 뉴", "신형", "NEW", "LF" 등을 제거
pub fn strip_model_prefixes(text: &str) -> String {
    let mut result = text.trim().to_string();
    for re in MODEL_PREFIX_RES.iter() {
        result = re.replace(&result, "").into_owned();
    }
    result
}

/// "(NN년~...)" 를 모두 제거
pub fn strip_year_ranges(text: &str) -> String {
    YEAR_RANGE_RE.replace_all(text, "").into_owned()
}

/// "(DN8)" 같은 세대코드 괄호를 제거
pub fn strip_generation_parens(text: &str) -> String {
    GENERATION_PAREN_RE.replace_all(text, "").into_owned()
}

/// 연속 공백을 하나로 줄이고 앞뒤 공백 제거
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// 공백을 모두 제거하고 대문자화 (접두어 비교용)
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// 텍스트 안의 모든 연식 범위 (등장 순)
pub fn year_ranges(text: &str) -> Vec<YearRange> {
    YEAR_RANGE_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let start = cap[1].parse::<u32>().ok()?;
            let tail = &cap[2];
            let open_ended = tail.contains("현재");
            let end = if open_ended {
                None
            } else {
                RANGE_END_RE
                    .captures(tail)
                    .and_then(|c| c[1].parse::<u32>().ok())
            };
            Some(YearRange { start, end, open_ended })
        })
        .collect()
}

/// 첫 번째 연식 범위 (트림명용)
pub fn first_year_range(text: &str) -> Option<YearRange> {
    year_ranges(text).into_iter().next()
}

/// 마지막 연식 범위. 제목에 범위가 여러 개면 마지막 것이 실제 차량 연식이다.
pub fn last_year_range(text: &str) -> Option<YearRange> {
    year_ranges(text).into_iter().last()
}

/// 영숫자・한글 여부 (단어 경계 판정용)
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// `needle` 이 앞뒤로 영숫자・한글과 붙어 있지 않은 위치에 나타나는지
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    contains_bounded(haystack, needle, is_word_char)
}

/// ASCII 영숫자만 경계로 보는 검사. "DN8" 안의 "N" 은 걸리지 않는다.
pub fn contains_ascii_word(haystack: &str, needle: &str) -> bool {
    contains_bounded(haystack, needle, |c| c.is_ascii_alphanumeric())
}

fn contains_bounded(haystack: &str, needle: &str, is_joined: impl Fn(char) -> bool) -> bool {
    if needle.is_empty() {
        return false;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        if !before.is_some_and(&is_joined) && !after.is_some_and(&is_joined) {
            return true;
        }
        // 겹치는 후보도 확인하기 위해 한 글자만 전진
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// 앞뒤가 ASCII 영숫자가 아닌 `word` 만 지운다 ("EV6" 의 "EV" 는 남김)
pub fn remove_ascii_word(text: &str, word: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in text.match_indices(word) {
        if start < last {
            continue;
        }
        let end = start + word.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if before.is_some_and(|c| c.is_ascii_alphanumeric()) || after.is_some_and(|c| c.is_ascii_alphanumeric()) {
            continue;
        }
        out.push_str(&text[last..start]);
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

/// ASCII 영숫자 덩어리 목록 ("그랜저IG(16년~)" → ["IG", "16"])
pub fn ascii_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}
