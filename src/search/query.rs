//! 쿼리 분석기
//!
//! 자유 텍스트 질의를 매칭용 용어 목록(`TermSet`)으로 변환합니다.
//! - 단어 토큰 (불용어 제외)
//! - 질의에 포함된 도메인 키워드
//! - 인접 2단어 / 3단어 구문

use std::sync::OnceLock;

use regex::Regex;

use super::vocabulary::Vocabulary;

/// 단어 토큰 패턴 (영숫자 + 밑줄)
fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b\w+\b").expect("Invalid regex"))
}

// ============================================================================
// TermSet
// ============================================================================

/// 중복 없는, 첫 등장 순서를 유지하는 용어 목록
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<String>,
}

impl TermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 용어 추가 (이미 있으면 무시)
    ///
    /// # Returns
    /// 새로 추가되었으면 `true`
    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if self.terms.contains(&term) {
            return false;
        }
        self.terms.push(term);
        true
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.terms
    }
}

impl<S: Into<String>> FromIterator<S> for TermSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for term in iter {
            set.insert(term);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

// ============================================================================
// QueryAnalyzer
// ============================================================================

/// 쿼리 분석기
#[derive(Debug, Clone, Default)]
pub struct QueryAnalyzer {
    vocabulary: Vocabulary,
}

impl QueryAnalyzer {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// 질의에서 핵심 용어 추출
    ///
    /// 순서: 단어 토큰 → 도메인 키워드 → 2단어 구문 → 3단어 구문.
    /// 구문은 불용어를 걸러내지 않은 공백 분할 결과로 만듭니다.
    pub fn extract_key_terms(&self, query: &str) -> TermSet {
        let query = query.to_lowercase();

        let tokens = word_pattern()
            .find_iter(&query)
            .map(|m| m.as_str())
            .filter(|token| !self.vocabulary.is_stop_word(token))
            .map(str::to_string);

        // 키워드는 소문자로 추가해 단어 토큰과 중복되지 않게 함
        let keywords = self
            .vocabulary
            .domain_keywords()
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .filter(|keyword| query.contains(keyword.as_str()));

        let words: Vec<&str> = query.split_whitespace().collect();
        let bigrams = words.windows(2).map(|w| w.join(" "));
        let trigrams = words.windows(3).map(|w| w.join(" "));

        let terms: TermSet = tokens
            .chain(keywords)
            .chain(bigrams)
            .chain(trigrams)
            .collect();

        tracing::debug!("Extracted {} terms from query: {:?}", terms.len(), terms.as_slice());
        terms
    }
}

/// 기본 어휘로 용어 추출
pub fn extract_key_terms(query: &str) -> TermSet {
    QueryAnalyzer::default().extract_key_terms(query)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert!(extract_key_terms("").is_empty());
        assert!(extract_key_terms("   ").is_empty());
    }

    #[test]
    fn test_stop_word_dropped_but_kept_in_phrase() {
        let terms = extract_key_terms("the ventilator");
        assert_eq!(terms.as_slice(), &["ventilator", "the ventilator"]);
    }

    #[test]
    fn test_single_word_has_no_phrases() {
        let terms = extract_key_terms("Calibration");
        assert_eq!(terms.as_slice(), &["calibration"]);
    }

    #[test]
    fn test_order_tokens_keywords_phrases() {
        let terms = extract_key_terms("FDA rules for infusion pumps");
        assert_eq!(
            terms.as_slice(),
            &[
                "fda",
                "rules",
                "infusion",
                "pumps",
                "fda rules",
                "rules for",
                "for infusion",
                "infusion pumps",
                "fda rules for",
                "rules for infusion",
                "for infusion pumps",
            ]
        );
    }

    #[test]
    fn test_domain_keyword_substring_match() {
        // 부분 문자열 매칭이므로 "devices"는 "device"와 "ce"를 모두 끌어옴
        let terms = extract_key_terms("devices");
        assert_eq!(terms.as_slice(), &["devices", "device", "ce"]);
    }

    #[test]
    fn test_phrases_use_raw_split() {
        let terms = extract_key_terms("MRI, safety");
        // 단어 토큰은 구두점 제거, 구문은 원형 유지
        assert!(terms.iter().any(|t| t == "mri"));
        assert!(terms.iter().any(|t| t == "mri, safety"));
    }

    #[test]
    fn test_deduplication_preserves_first_occurrence() {
        let terms = extract_key_terms("pump pump pump");
        assert_eq!(terms.as_slice(), &["pump", "pump pump", "pump pump pump"]);
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = Vocabulary::new(vec!["what".to_string()], vec!["Stent".to_string()]);
        let analyzer = QueryAnalyzer::new(vocab);
        let terms = analyzer.extract_key_terms("what stent");
        assert_eq!(terms.as_slice(), &["stent", "what stent"]);
    }

    #[test]
    fn test_term_set_insert() {
        let mut set = TermSet::new();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert!(set.insert("b"));
        assert_eq!(set.len(), 2);
    }
}
