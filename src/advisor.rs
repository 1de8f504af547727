//! 질의응답 파이프라인
//!
//! PDF 검색 → 웹 검색 → 프롬프트 생성 → 언어 모델 호출.
//! 웹 검색과 모델 호출의 실패는 오류 문자열로 대체되어 파이프라인을 멈추지 않습니다.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::llm::LanguageModel;
use crate::prompt::generate_prompt;
use crate::search::PdfSearchTool;
use crate::websearch::WebSearch;

/// 질문이 비었을 때의 오류 메시지
pub const EMPTY_QUESTION: &str = "Please enter a question to continue.";

/// 파이프라인 결과
#[derive(Debug, Clone)]
pub struct Answer {
    /// PDF 검색 결과 (PDF가 없으면 빈 문자열)
    pub pdf_context: String,
    /// 웹 검색 결과 또는 오류 문자열
    pub web_results: String,
    /// 모델에 보낸 프롬프트
    pub prompt: String,
    /// 모델 답변 (모델이 없으면 `None`)
    pub content: Option<String>,
}

/// 질의응답 어드바이저
pub struct Advisor {
    pdf_tool: Arc<PdfSearchTool>,
    web: Option<Box<dyn WebSearch>>,
    model: Option<Box<dyn LanguageModel>>,
}

impl Advisor {
    pub fn new(
        pdf_tool: PdfSearchTool,
        web: Option<Box<dyn WebSearch>>,
        model: Option<Box<dyn LanguageModel>>,
    ) -> Self {
        Self {
            pdf_tool: Arc::new(pdf_tool),
            web,
            model,
        }
    }

    /// 질문에 답변
    ///
    /// # Arguments
    /// * `question` - 자유 텍스트 질문
    /// * `pdf_paths` - 검색할 PDF 경로 (비어 있으면 PDF 검색 생략)
    pub async fn ask(&self, question: &str, pdf_paths: Vec<PathBuf>) -> Result<Answer> {
        if question.trim().is_empty() {
            anyhow::bail!(EMPTY_QUESTION);
        }

        let pdf_context = self.search_pdfs(question, pdf_paths).await?;
        let web_results = self.search_web(question).await;
        let prompt = generate_prompt(question, &pdf_context, &web_results);

        let content = match &self.model {
            Some(model) => {
                tracing::info!("Requesting answer from {}", model.name());
                Some(match model.complete(&prompt).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        tracing::warn!("Language model call failed: {:#}", e);
                        format!("Error generating answer: {}", e)
                    }
                })
            }
            None => None,
        };

        Ok(Answer {
            pdf_context,
            web_results,
            prompt,
            content,
        })
    }

    /// PDF 검색 (CPU 바운드이므로 spawn_blocking 사용)
    pub async fn search_pdfs(&self, question: &str, pdf_paths: Vec<PathBuf>) -> Result<String> {
        if pdf_paths.is_empty() {
            return Ok(String::new());
        }

        let tool = Arc::clone(&self.pdf_tool);
        let question = question.to_string();
        tokio::task::spawn_blocking(move || tool.search(&question, &pdf_paths))
            .await
            .context("PDF search task failed")
    }

    async fn search_web(&self, question: &str) -> String {
        let Some(web) = &self.web else {
            return String::new();
        };

        match web.search(question).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Web search via {} failed: {:#}", web.name(), e);
                format!("Web search error: {}", e)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
