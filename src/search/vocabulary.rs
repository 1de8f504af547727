//! 검색 어휘 설정
//!
//! 불용어 집합과 의료/기술 도메인 키워드 목록을 하나의 불변 값으로 묶습니다.
//! `QueryAnalyzer`와 `PageScorer`는 생성 시점에 이 값을 받아 소유합니다.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// 기본 불용어
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "of", "for", "in", "to", "with", "on", "by",
];

/// 기본 도메인 키워드 (대소문자 원형 유지)
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    "medical",
    "clinical",
    "patient",
    "health",
    "hospital",
    "device",
    "equipment",
    "therapy",
    "diagnostic",
    "treatment",
    "imaging",
    "monitor",
    "ventilator",
    "implant",
    "surgical",
    "regulation",
    "safety",
    "sterilization",
    "FDA",
    "CE",
    "ISO",
    "specification",
    "compliance",
    "protocol",
    "technology",
];

// ============================================================================
// Vocabulary
// ============================================================================

/// 불용어 + 도메인 키워드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    stop_words: HashSet<String>,
    domain_keywords: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()),
            DEFAULT_DOMAIN_KEYWORDS.iter().map(|s| s.to_string()),
        )
    }
}

/// JSON 어휘 파일 형식
///
/// 생략된 필드는 기본 목록을 사용합니다.
#[derive(Debug, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    stop_words: Option<Vec<String>>,
    #[serde(default)]
    domain_keywords: Option<Vec<String>>,
}

impl Vocabulary {
    /// 목록으로 생성
    ///
    /// 불용어는 소문자 토큰과 비교되므로 소문자로 저장합니다.
    pub fn new<S, K>(stop_words: S, domain_keywords: K) -> Self
    where
        S: IntoIterator<Item = String>,
        K: IntoIterator<Item = String>,
    {
        Self {
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
            domain_keywords: domain_keywords.into_iter().collect(),
        }
    }

    /// JSON 문자열에서 로드
    pub fn from_json(json: &str) -> Result<Self> {
        let file: VocabularyFile =
            serde_json::from_str(json).context("Failed to parse vocabulary JSON")?;
        let defaults = Self::default();

        Ok(Self {
            stop_words: match file.stop_words {
                Some(words) => words.into_iter().map(|w| w.to_lowercase()).collect(),
                None => defaults.stop_words,
            },
            domain_keywords: file.domain_keywords.unwrap_or(defaults.domain_keywords),
        })
    }

    /// JSON 파일에서 로드
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file: {:?}", path))?;
        let vocabulary = Self::from_json(&json)?;
        tracing::info!(
            "Loaded vocabulary from {:?} ({} stop words, {} domain keywords)",
            path,
            vocabulary.stop_words.len(),
            vocabulary.domain_keywords.len()
        );
        Ok(vocabulary)
    }

    /// 불용어 여부
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn domain_keywords(&self) -> &[String] {
        &self.domain_keywords
    }
}

// ============================================================================
// Tests
// ============================================================================
