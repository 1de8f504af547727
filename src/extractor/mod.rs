//! 문서 추출 모듈
//!
//! 검색 대상 문서를 읽어 페이지별 텍스트와 메타데이터로 변환합니다.
//! - PDF: lopdf로 페이지 단위 추출, 실패 시 pdf-extract 전체 추출로 폴백

pub mod pdf;

use std::path::Path;

use crate::search::ScanError;

// ============================================================================
// Loaded Document
// ============================================================================

/// 문서 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// 문서 제목 (PDF Info /Title)
    pub title: Option<String>,
    /// 작성자 (PDF Info /Author)
    pub author: Option<String>,
}

/// 페이지 텍스트까지 추출된 문서
#[derive(Debug)]
pub struct LoadedDocument {
    /// 표시용 파일명
    pub filename: String,
    pub metadata: DocumentMetadata,
    /// 페이지 순서대로의 텍스트 (페이지 번호 = 인덱스 + 1)
    ///
    /// 추출에 실패한 페이지는 `Err`로 남으며 검색 시 건너뜁니다.
    pub pages: Vec<Result<String, ScanError>>,
}

impl LoadedDocument {
    /// 텍스트 페이지 목록으로 생성
    pub fn from_pages<I, S>(filename: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filename: filename.into(),
            metadata: DocumentMetadata::default(),
            pages: pages.into_iter().map(|p| Ok(p.into())).collect(),
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

// ============================================================================
// Document Loader
// ============================================================================

/// 파일 경로 → 문서 변환 트레이트
pub trait DocumentLoader: Send + Sync {
    /// 문서 로드
    ///
    /// 문서 전체를 읽을 수 없으면 `Err`, 일부 페이지만 실패하면
    /// 해당 페이지만 `Err`로 채워 반환합니다.
    fn load(&self, path: &Path) -> Result<LoadedDocument, ScanError>;
}

/// PDF 로더
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<LoadedDocument, ScanError> {
        pdf::load_pdf(path)
    }
}

// ============================================================================
// Tests
// ============================================================================
