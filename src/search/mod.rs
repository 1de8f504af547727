//! PDF 관련도 검색 모듈
//!
//! 질의 → 용어 추출 → 페이지 점수 → 문단 발췌 → 문서별 상위 3페이지 → 텍스트 포맷.
//!
//! 한 번의 호출은 동기적으로 끝까지 실행되며 호출 간 공유 상태가 없습니다.
//! 문서/페이지 단위 실패는 결과에 흡수되고 전체 검색을 중단시키지 않습니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let tool = PdfSearchTool::new();
//! let context = tool.search("ventilator calibration", &["manual.pdf"]);
//! ```

mod excerpt;
mod query;
mod report;
mod scanner;
mod vocabulary;

use std::path::Path;

use crate::extractor::{DocumentLoader, LoadedDocument, PdfLoader};

// Re-exports
pub use excerpt::{distinct_term_hits, select_excerpt, split_paragraphs, MAX_PARAGRAPHS};
pub use query::{extract_key_terms, QueryAnalyzer, TermSet};
pub use report::{
    render, DocumentOutcome, DocumentReport, FailedDocument, PageResult, MAX_PAGES_PER_DOCUMENT,
    NO_RESULTS,
};
pub use scanner::{count_occurrences, detect_headings, PageScorer};
pub use vocabulary::{Vocabulary, DEFAULT_DOMAIN_KEYWORDS, DEFAULT_STOP_WORDS};

/// 파일명을 알 수 없을 때 사용하는 표시 이름
pub const UNKNOWN_DOCUMENT: &str = "<unknown>";

// ============================================================================
// Errors
// ============================================================================

/// 문서/페이지 처리 오류
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 파일 읽기 실패
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// PDF 구조 해석 실패
    #[error("{0}")]
    Parse(String),

    /// 페이지 텍스트 추출 실패
    #[error("page {page}: {message}")]
    PageText { page: usize, message: String },
}

// ============================================================================
// PdfSearchTool
// ============================================================================

/// PDF 관련도 검색기
pub struct PdfSearchTool {
    analyzer: QueryAnalyzer,
    scorer: PageScorer,
    loader: Box<dyn DocumentLoader>,
}

impl Default for PdfSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSearchTool {
    /// 기본 어휘 + PDF 로더
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::default())
    }

    /// 어휘 지정
    pub fn with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self::with_loader(vocabulary, Box::new(PdfLoader))
    }

    /// 어휘와 문서 로더 지정
    pub fn with_loader(vocabulary: Vocabulary, loader: Box<dyn DocumentLoader>) -> Self {
        Self {
            analyzer: QueryAnalyzer::new(vocabulary.clone()),
            scorer: PageScorer::new(vocabulary),
            loader,
        }
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }

    /// 파일 경로 목록 검색
    ///
    /// 경로 순서대로 문서를 읽고, 읽기에 실패한 문서는
    /// `Error processing <파일명>: <메시지>` 줄로 결과에 포함합니다.
    pub fn search<P: AsRef<Path>>(&self, query: &str, paths: &[P]) -> String {
        let terms = self.analyzer.extract_key_terms(query);

        let outcomes: Vec<DocumentOutcome> = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let label = document_label(path);
                match self.loader.load(path) {
                    Ok(doc) => Ok(self.scan_document(&doc, &terms)),
                    Err(error) => {
                        tracing::warn!("Failed to process {}: {}", label, error);
                        Err(FailedDocument { label, error })
                    }
                }
            })
            .collect();

        self.finish(&outcomes)
    }

    /// 이미 로드된 문서 검색
    pub fn search_documents(&self, query: &str, documents: &[LoadedDocument]) -> String {
        let terms = self.analyzer.extract_key_terms(query);
        let outcomes: Vec<DocumentOutcome> = documents
            .iter()
            .map(|doc| Ok(self.scan_document(doc, &terms)))
            .collect();

        self.finish(&outcomes)
    }

    /// 문서 한 개의 페이지별 점수 계산 및 상위 페이지 선택
    pub fn scan_document(&self, doc: &LoadedDocument, terms: &TermSet) -> DocumentReport {
        let mut pages = Vec::new();

        for (index, page) in doc.pages.iter().enumerate() {
            let page_number = index + 1;
            match self.scan_page(page_number, page, terms) {
                Ok(Some(result)) => pages.push(result),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping page {} of {}: {}", page_number, doc.filename, e);
                }
            }
        }

        DocumentReport::new(doc.filename.clone(), doc.metadata.clone(), pages)
    }

    /// 페이지 한 개 처리
    ///
    /// 텍스트가 없거나, 점수가 0이거나, 발췌문이 비면 `Ok(None)`.
    fn scan_page<'p>(
        &self,
        page_number: usize,
        page: &'p Result<String, ScanError>,
        terms: &TermSet,
    ) -> Result<Option<PageResult>, &'p ScanError> {
        let text = page.as_ref()?;
        if text.is_empty() {
            return Ok(None);
        }

        let relevance = self.scorer.score_page(text, terms);
        tracing::debug!("Page {} relevance: {:.4}", page_number, relevance);
        if relevance <= 0.0 {
            return Ok(None);
        }

        let excerpt = select_excerpt(text, terms);
        if excerpt.is_empty() {
            return Ok(None);
        }

        Ok(Some(PageResult {
            page_number,
            relevance,
            excerpt,
        }))
    }

    fn finish(&self, outcomes: &[DocumentOutcome]) -> String {
        let matched = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(report) if !report.is_empty()))
            .count();
        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        tracing::info!(
            "PDF search finished: {} documents, {} with results, {} failed",
            outcomes.len(),
            matched,
            failed
        );

        render(outcomes)
    }
}

/// 경로에서 표시용 파일명 추출
pub fn document_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN_DOCUMENT.to_string())
}

// ============================================================================
// Tests
// ============================================================================
