//! 페이지 관련도 점수 계산
//!
//! 점수 = (용어 빈도 × 2 + 제목 보너스 5 + 도메인 키워드 보너스 1) / (단어 수 / 200)
//!
//! 제목 감지는 정규식 기반 휴리스틱입니다. 레이아웃을 해석하지 않으며
//! 대문자로 된 구간(콜론으로 끝나거나 단어 경계로 끝나는)을 제목으로 간주합니다.

use std::sync::OnceLock;

use regex::Regex;

use super::query::TermSet;
use super::vocabulary::Vocabulary;

/// 용어 1회 등장당 점수
pub const TERM_WEIGHT: f64 = 2.0;
/// 제목 안에 용어가 있을 때 제목당 보너스
pub const HEADING_BONUS: f64 = 5.0;
/// 페이지에 도메인 키워드가 있을 때 키워드당 보너스
pub const KEYWORD_BONUS: f64 = 1.0;
/// 정규화 기준 단어 수
pub const NORMALIZATION_WORDS: f64 = 200.0;

/// 제목 패턴: `ALL CAPS:` 또는 단어 경계로 둘러싸인 대문자 구간
fn heading_pattern() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"([A-Z][A-Z\s]+:|\b[A-Z][A-Z\s]+\b)").expect("Invalid regex")
    })
}

/// 원문(대소문자 유지)에서 제목처럼 보이는 구간 추출
pub fn detect_headings(text: &str) -> Vec<&str> {
    heading_pattern()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// 겹치지 않는 부분 문자열 등장 횟수
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

// ============================================================================
// PageScorer
// ============================================================================

/// 페이지 점수 계산기
#[derive(Debug, Clone, Default)]
pub struct PageScorer {
    vocabulary: Vocabulary,
}

impl PageScorer {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// 페이지 관련도 점수
    ///
    /// 단어 수가 0이면 0을 반환합니다. 질의 용어가 하나도 없어도
    /// 도메인 키워드가 있으면 양수 점수가 나옵니다.
    pub fn score_page(&self, page_text: &str, terms: &TermSet) -> f64 {
        let text_lower = page_text.to_lowercase();
        let word_count = text_lower.split_whitespace().count();
        if word_count == 0 {
            return 0.0;
        }

        let headings: Vec<String> = detect_headings(page_text)
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        let mut score = 0.0;

        for term in terms.iter() {
            let term_lower = term.to_lowercase();
            let count = count_occurrences(&text_lower, &term_lower);
            if count == 0 {
                continue;
            }

            score += count as f64 * TERM_WEIGHT;

            let heading_hits = headings
                .iter()
                .filter(|heading| heading.contains(term_lower.as_str()))
                .count();
            score += heading_hits as f64 * HEADING_BONUS;
        }

        let keyword_hits = self
            .vocabulary
            .domain_keywords()
            .iter()
            .filter(|keyword| text_lower.contains(keyword.to_lowercase().as_str()))
            .count();
        score += keyword_hits as f64 * KEYWORD_BONUS;

        score / (word_count as f64 / NORMALIZATION_WORDS)
    }
}

// ============================================================================
// Tests
// ============================================================================
