//! 검색 결과 집계 및 포맷팅
//!
//! 문서별 상위 페이지를 정렬/절단하고, 언어 모델 프롬프트에 그대로 넣을
//! 텍스트 블록으로 변환합니다. 결과 문자열은 표시용이며 기계 파싱 대상이 아닙니다.

use crate::extractor::DocumentMetadata;

use super::ScanError;

/// 문서당 유지할 최대 페이지 수
pub const MAX_PAGES_PER_DOCUMENT: usize = 3;

/// 모든 문서에서 결과가 없을 때 반환하는 문자열
pub const NO_RESULTS: &str = "No relevant information found in the provided PDFs.";

/// 문서 블록 사이 구분선 길이
const SEPARATOR_WIDTH: usize = 50;

// ============================================================================
// Types
// ============================================================================

/// 관련 페이지 하나
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// 1부터 시작하는 페이지 번호
    pub page_number: usize,
    /// 정규화된 관련도 점수 (> 0)
    pub relevance: f64,
    /// 선택된 발췌문
    pub excerpt: String,
}

/// 문서 하나의 검색 결과
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub filename: String,
    pub metadata: DocumentMetadata,
    /// 점수 내림차순, 최대 3개
    pub pages: Vec<PageResult>,
}

impl DocumentReport {
    /// 페이지 결과를 점수순 정렬 후 상위 3개만 유지
    pub fn new(filename: String, metadata: DocumentMetadata, mut pages: Vec<PageResult>) -> Self {
        pages.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
        pages.truncate(MAX_PAGES_PER_DOCUMENT);
        Self {
            filename,
            metadata,
            pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 헤더 + 페이지 블록
    pub fn render(&self) -> String {
        let mut out = format!("Document: {}", self.filename);
        if let Some(title) = self.metadata.title.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(&format!("\nTitle: {}", title));
        }
        if let Some(author) = self.metadata.author.as_deref().filter(|a| !a.is_empty()) {
            out.push_str(&format!("\nAuthor: {}", author));
        }
        out.push_str("\n\n");

        for page in &self.pages {
            out.push_str(&format!(
                "Page {} (Relevance: {:.2}):\n{}\n\n",
                page.page_number, page.relevance, page.excerpt
            ));
        }

        out
    }
}

/// 처리에 실패한 문서
#[derive(Debug)]
pub struct FailedDocument {
    /// 파일명 (알 수 없으면 `<unknown>`)
    pub label: String,
    pub error: ScanError,
}

impl FailedDocument {
    pub fn render(&self) -> String {
        format!("Error processing {}: {}", self.label, self.error)
    }
}

/// 문서 단위 처리 결과
pub type DocumentOutcome = Result<DocumentReport, FailedDocument>;

// ============================================================================
// Rendering
// ============================================================================

/// 전체 결과 문자열 생성
///
/// 결과가 있는 문서와 실패한 문서만 블록을 만들며, 아무 블록도 없으면
/// [`NO_RESULTS`]를 반환합니다.
pub fn render(outcomes: &[DocumentOutcome]) -> String {
    let blocks: Vec<String> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            Ok(report) if report.is_empty() => None,
            Ok(report) => Some(report.render()),
            Err(failed) => Some(failed.render()),
        })
        .collect();

    if blocks.is_empty() {
        return NO_RESULTS.to_string();
    }

    let separator = format!("\n{}\n\n", "=".repeat(SEPARATOR_WIDTH));
    format!("\n\n{}", blocks.join(&separator))
}

// ============================================================================
// Tests
// ============================================================================
