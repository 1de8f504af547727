//! 입력 PDF 수집 모듈
//!
//! 명시된 파일과 폴더(재귀)에서 검색할 PDF 경로를 모읍니다.
//! .gitignore 패턴을 존중하고, `.pdf` 확장자만 수집합니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// 기본 최대 파일 크기 (50MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// PDF 확장자 여부 (대소문자 무시)
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

// ============================================================================
// Collector
// ============================================================================

/// 수집기 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// .gitignore 패턴 존중 여부
    pub respect_gitignore: bool,
    /// 숨김 파일 포함 여부
    pub include_hidden: bool,
    /// 최대 파일 크기 (바이트, 0이면 제한 없음)
    pub max_file_size: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            include_hidden: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// PDF 수집기
pub struct PdfCollector {
    config: CollectorConfig,
}

impl PdfCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(CollectorConfig::default())
    }

    /// 파일 목록과 폴더에서 PDF 수집
    ///
    /// 명시한 파일 순서가 먼저, 폴더에서 찾은 파일은 경로순으로 뒤에 붙습니다.
    /// 같은 경로는 한 번만 포함합니다. 존재하지 않는 명시 파일은 걸러내지 않고
    /// 그대로 포함해 검색 결과에 `Error processing` 줄로 남게 합니다.
    pub fn collect(&self, files: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        let mut collected = Vec::new();

        for file in files {
            // 없는 파일은 그대로 넘겨 검색 단계에서 문서 오류로 보고
            if !file.exists() {
                tracing::warn!("File not found, passing through: {:?}", file);
                if !collected.contains(file) {
                    collected.push(file.clone());
                }
                continue;
            }

            if let Some(path) = self.collect_file(file)? {
                if !collected.contains(&path) {
                    collected.push(path);
                }
            }
        }

        if let Some(dir) = dir {
            for path in self.collect_directory(dir)? {
                if !collected.contains(&path) {
                    collected.push(path);
                }
            }
        }

        Ok(collected)
    }

    /// 단일 파일 수집
    ///
    /// PDF가 아니거나 크기 제한을 넘으면 `Ok(None)`.
    pub fn collect_file(&self, path: &Path) -> Result<Option<PathBuf>> {
        if !path.exists() {
            anyhow::bail!("File not found: {:?}", path);
        }

        if !path.is_file() {
            anyhow::bail!("Not a file: {:?}", path);
        }

        if !is_pdf(path) {
            tracing::warn!("Skipping non-PDF file: {:?}", path);
            return Ok(None);
        }

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read metadata: {:?}", path))?;

        if !self.within_size_limit(path, metadata.len()) {
            return Ok(None);
        }

        Ok(Some(path.to_path_buf()))
    }

    /// 폴더 재귀 수집
    pub fn collect_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            anyhow::bail!("Directory not found: {:?}", path);
        }

        if !path.is_dir() {
            anyhow::bail!("Not a directory: {:?}", path);
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(path)
            .hidden(!self.config.include_hidden)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .require_git(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            if !is_pdf(entry.path()) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    tracing::warn!("Failed to read metadata: {}", e);
                    continue;
                }
            };

            if self.within_size_limit(entry.path(), size) {
                files.push(entry.path().to_path_buf());
            }
        }

        tracing::info!("Collected {} PDFs from {:?}", files.len(), path);
        Ok(files)
    }

    fn within_size_limit(&self, path: &Path, size: u64) -> bool {
        if self.config.max_file_size > 0 && size > self.config.max_file_size {
            tracing::warn!("Skipping large file: {:?} ({} bytes)", path, size);
            return false;
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("manual.pdf")));
        assert!(is_pdf(Path::new("MANUAL.PDF")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_collector_config_default() {
        let config = CollectorConfig::default();
        assert!(config.respect_gitignore);
        assert!(!config.include_hidden);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_collect_missing_file() {
        let collector = PdfCollector::with_defaults();
        assert!(collector
            .collect_file(Path::new("/nonexistent/manual.pdf"))
            .is_err());
    }

    #[test]
    fn test_size_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.pdf");
        std::fs::write(&path, vec![0u8; 64]).expect("write");

        let collector = PdfCollector::new(CollectorConfig {
            max_file_size: 10,
            ..Default::default()
        });
        assert_eq!(collector.collect_file(&path).expect("collect"), None);
    }
}
