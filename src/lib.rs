//! meditech-advisor - PDF 관련도 검색 + 웹 검색 기반 질의응답
//!
//! 업로드된 PDF에서 질의와 관련된 페이지/문단을 키워드 휴리스틱으로 골라내고,
//! 웹 검색 결과와 함께 프롬프트로 묶어 언어 모델에 전달합니다.

pub mod advisor;
pub mod cli;
pub mod collector;
pub mod extractor;
pub mod llm;
pub mod prompt;
pub mod search;
pub mod websearch;

// Re-exports
pub use advisor::{Advisor, Answer};
pub use extractor::{DocumentLoader, DocumentMetadata, LoadedDocument, PdfLoader};
pub use llm::{GroqChat, LanguageModel};
pub use search::{
    extract_key_terms, select_excerpt, PageResult, PageScorer, PdfSearchTool, QueryAnalyzer,
    ScanError, TermSet, Vocabulary, NO_RESULTS,
};
pub use websearch::{DuckDuckGoSearch, WebSearch};
