//! 언어 모델 모듈 - Groq Chat Completions
//!
//! 완성된 프롬프트를 언어 모델 서비스로 보내 답변 텍스트를 받습니다.
//! Groq는 OpenAI 호환 `chat/completions` API를 제공합니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let model = GroqChat::from_env()?;
//! let answer = model.complete("What is ISO 13485?").await?;
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// LanguageModel Trait
// ============================================================================

/// 언어 모델 트레이트
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 프롬프트 → 답변
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// 모델 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Groq
// ============================================================================

/// Groq Chat Completions 엔드포인트
/// source: https://console.groq.com/docs/api-reference#chat-create
const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// 기본 모델
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// 429/전송 실패 시 최대 재시도 횟수
const MAX_RETRIES: u32 = 3;
/// 재시도 시 초기 백오프 (ms)
const INITIAL_BACKOFF_MS: u64 = 2000;

/// Groq 언어 모델
#[derive(Debug)]
pub struct GroqChat {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqChat {
    /// 새 인스턴스 생성
    ///
    /// # Arguments
    /// * `api_key` - Groq API 키
    /// * `model` - 모델 ID (예: `llama-3.3-70b-versatile`)
    pub fn new(api_key: String, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            model: model.into(),
            client,
        })
    }

    /// 환경변수에서 API 키와 모델을 읽어 생성
    ///
    /// 모델 우선순위: `model` 인자 > `MEDITECH_MODEL` > 기본 모델
    pub fn from_env(model: Option<String>) -> Result<Self> {
        let api_key = get_api_key()?;
        Self::new(api_key, resolve_model(model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// 요청 본문
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// 응답 본문
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// 에러 응답
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
}

/// 응답 본문에서 첫 번째 답변 추출
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).context("Failed to parse completion response")?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| anyhow::anyhow!("Completion response contained no content"))
}

#[async_trait]
impl LanguageModel for GroqChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<anyhow::Error> = None;

        // 재시도 루프 (429 에러 시 지수 백오프)
        for attempt in 0..=MAX_RETRIES {
            let backoff = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt));

            let response = match self
                .client
                .post(GROQ_CHAT_URL)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(anyhow::anyhow!("Failed to send completion request: {}", e));
                    if attempt < MAX_RETRIES {
                        tracing::warn!(
                            "Request failed, retrying in {:?} (attempt {}/{})",
                            backoff,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    break;
                }
            };

            let status = response.status();
            let body = response
                .text()
                .await
                .context("Failed to read response body")?;

            if status.is_success() {
                return parse_completion(&body);
            }

            if status.as_u16() == 429 {
                tracing::warn!(
                    "Rate limit hit (429), backing off {:?} (attempt {}/{})",
                    backoff,
                    attempt + 1,
                    MAX_RETRIES
                );
                last_error = Some(anyhow::anyhow!("Rate limit exceeded (429)"));

                if attempt < MAX_RETRIES {
                    tokio::time::sleep(backoff).await;
                    continue;
                }
            } else {
                if let Ok(error) = serde_json::from_str::<ApiError>(&body) {
                    anyhow::bail!("Groq API error ({}): {}", error.error.kind, error.error.message);
                }
                anyhow::bail!("Groq API error ({}): {}", status, body);
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow::anyhow!("Completion failed after {} retries", MAX_RETRIES)))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// API 키 로드 (`GROQ_API_KEY`)
pub fn get_api_key() -> Result<String> {
    match std::env::var("GROQ_API_KEY") {
        Ok(key) if !key.is_empty() => {
            tracing::debug!("Using API key from GROQ_API_KEY");
            Ok(key)
        }
        _ => anyhow::bail!(
            "API key not found. Set GROQ_API_KEY environment variable.\n\
             Get your API key at: https://console.groq.com/keys"
        ),
    }
}

/// API 키 존재 여부 확인
pub fn has_api_key() -> bool {
    std::env::var("GROQ_API_KEY")
        .map(|key| !key.is_empty())
        .unwrap_or(false)
}

/// 사용할 모델 결정
pub fn resolve_model(model: Option<String>) -> String {
    model
        .filter(|m| !m.is_empty())
        .or_else(|| std::env::var("MEDITECH_MODEL").ok().filter(|m| !m.is_empty()))
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

// ============================================================================
// Tests
// ============================================================================
