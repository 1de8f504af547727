//! 발췌문 선택
//!
//! 페이지를 빈 줄 기준 문단으로 나누고, 문단마다 포함된 서로 다른 용어 수를 센 뒤
//! 상위 문단을 골라 발췌문을 만듭니다.

use std::sync::OnceLock;

use regex::Regex;

use super::query::TermSet;

/// 발췌문에 포함할 최대 문단 수
pub const MAX_PARAGRAPHS: usize = 3;

/// 문단 경계 (하나 이상의 빈 줄)
fn paragraph_break() -> &'static Regex {
    static BREAK: OnceLock<Regex> = OnceLock::new();
    BREAK.get_or_init(|| Regex::new(r"\n\s*\n").expect("Invalid regex"))
}

/// 빈 줄 기준 문단 분할 (trim, 빈 문단 제거)
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// 문단에 포함된 서로 다른 용어 수
///
/// 용어가 여러 번 나와도 1로 셉니다.
pub fn distinct_term_hits(paragraph: &str, terms: &TermSet) -> usize {
    let paragraph = paragraph.to_lowercase();
    terms
        .iter()
        .filter(|term| paragraph.contains(term.to_lowercase().as_str()))
        .count()
}

/// 관련 문단 발췌
///
/// 매칭 수 내림차순, 동점이면 원래 문단 순서. 최대 3개를 빈 줄로 이어 붙이며
/// 해당 문단이 없으면 빈 문자열을 반환합니다.
pub fn select_excerpt(page_text: &str, terms: &TermSet) -> String {
    let mut scored: Vec<(&str, usize)> = split_paragraphs(page_text)
        .into_iter()
        .map(|p| (p, distinct_term_hits(p, terms)))
        .filter(|(_, hits)| *hits > 0)
        .collect();

    // sort_by는 안정 정렬
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored
        .into_iter()
        .take(MAX_PARAGRAPHS)
        .map(|(p, _)| p)
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Tests
// ============================================================================
