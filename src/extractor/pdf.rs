//! PDF 텍스트 추출 모듈
//!
//! lopdf로 페이지 단위 텍스트와 Info 메타데이터를 읽습니다.
//! lopdf가 어떤 페이지에서도 텍스트를 얻지 못하면 pdf-extract로 전체 텍스트를
//! 추출한 뒤 페이지 구분자로 나눕니다.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use regex::Regex;

use super::{DocumentMetadata, LoadedDocument};
use crate::search::{document_label, ScanError};

/// PDF 파일 로드
pub fn load_pdf(path: &Path) -> Result<LoadedDocument, ScanError> {
    let bytes = std::fs::read(path)?;
    load_pdf_from_mem(document_label(path), &bytes)
}

/// 메모리의 PDF 로드
pub fn load_pdf_from_mem(filename: String, bytes: &[u8]) -> Result<LoadedDocument, ScanError> {
    let doc = Document::load_mem(bytes).map_err(|e| ScanError::Parse(e.to_string()))?;
    let metadata = read_metadata(&doc);

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut pages: Vec<Result<String, ScanError>> = page_numbers
        .iter()
        .map(|&number| {
            doc.extract_text(&[number])
                .map_err(|e| ScanError::PageText {
                    page: number as usize,
                    message: e.to_string(),
                })
        })
        .collect();

    let has_text = pages
        .iter()
        .any(|page| page.as_ref().map(|t| !t.trim().is_empty()).unwrap_or(false));

    if !has_text {
        match extract_whole_text(bytes)? {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!("Falling back to pdf-extract for {}", filename);
                pages = split_pdf_pages(&text).into_iter().map(Ok).collect();
            }
            Ok(_) => {
                tracing::warn!(
                    "No text extracted from PDF: {}. It might be a scanned document.",
                    filename
                );
            }
            Err(e) => {
                tracing::debug!("pdf-extract fallback failed for {}: {}", filename, e);
            }
        }
    }

    tracing::debug!("Loaded {} ({} pages)", filename, pages.len());

    Ok(LoadedDocument {
        filename,
        metadata,
        pages,
    })
}

/// pdf-extract 전체 텍스트 추출
///
/// pdf-extract는 구조가 어긋난 PDF에서 panic하므로 panic을 문서 오류로 바꿉니다.
fn extract_whole_text(
    bytes: &[u8],
) -> Result<Result<String, pdf_extract::OutputError>, ScanError> {
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ScanError::Parse(format!("text extraction panicked: {}", message))
        })
}

// ============================================================================
// Metadata
// ============================================================================

/// trailer의 /Info 딕셔너리에서 제목/작성자 읽기
fn read_metadata(doc: &Document) -> DocumentMetadata {
    let info = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    match info {
        Some(info) => DocumentMetadata {
            title: info_string(doc, info, b"Title"),
            author: info_string(doc, info, b"Author"),
        },
        None => DocumentMetadata::default(),
    }
}

fn info_string(doc: &Document, info: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match info.get(key).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };

    match value {
        Object::String(bytes, _) => {
            let text = decode_pdf_string(bytes);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

/// PDF 텍스트 문자열 디코딩
///
/// BOM(FE FF)이 있으면 UTF-16BE, 없으면 바이트를 Latin-1 문자로 취급합니다.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    bytes.iter().map(|&b| b as char).collect()
}

// ============================================================================
// Page Splitting
// ============================================================================

/// 전체 추출 텍스트를 페이지별로 분리
///
/// 폼피드(\x0c) → `--- Page N ---` 형태 구분선 → 분리 실패 시 전체를 1페이지로.
fn split_pdf_pages(text: &str) -> Vec<String> {
    let pages: Vec<String> = text
        .split('\x0c')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if pages.len() > 1 {
        return pages;
    }

    if let Ok(page_pattern) =
        Regex::new(r"(?m)^[\s]*[-=]+[\s]*(?:Page[\s]*)?(\d+)[\s]*[-=]+[\s]*$")
    {
        let pages: Vec<String> = page_pattern
            .split(text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if pages.len() > 1 {
            return pages;
        }
    }

    vec![text.trim().to_string()]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pdf_pages_with_formfeed() {
        let text = "Page 1 content\x0cPage 2 content\x0cPage 3 content";
        let pages = split_pdf_pages(text);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], "Page 1 content");
        assert_eq!(pages[1], "Page 2 content");
    }

    #[test]
    fn test_split_pdf_pages_with_marker() {
        let text = "intro text\n--- Page 2 ---\nsecond page\n--- Page 3 ---\nthird page";
        let pages = split_pdf_pages(text);
        assert_eq!(pages, vec!["intro text", "second page", "third page"]);
    }

    #[test]
    fn test_split_pdf_pages_no_separator() {
        let text = "Just some text without page breaks";
        let pages = split_pdf_pages(text);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_decode_pdf_string_utf16() {
        let bytes = [0xFE, 0xFF, 0x00, 0x4D, 0x00, 0x52, 0x00, 0x49];
        assert_eq!(decode_pdf_string(&bytes), "MRI");
    }

    #[test]
    fn test_decode_pdf_string_latin1() {
        assert_eq!(decode_pdf_string(b"Infusion Pump"), "Infusion Pump");
        assert_eq!(decode_pdf_string(&[0x43, 0xE9]), "Cé");
    }

    #[test]
    fn test_load_invalid_bytes() {
        let result = load_pdf_from_mem("junk.pdf".to_string(), b"this is not a pdf");
        assert!(matches!(result, Err(ScanError::Parse(_))));
    }
}
