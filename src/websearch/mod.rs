//! 웹 검색 모듈 - DuckDuckGo HTML 결과 추출
//!
//! 질의 문자열로 웹 검색을 수행하고, 결과를 프롬프트에 넣을 텍스트로 만듭니다.
//! API 키가 필요 없는 DuckDuckGo HTML 엔드포인트를 사용합니다.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// DuckDuckGo HTML 검색 엔드포인트
const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// 기본 결과 개수
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// 결과가 없을 때의 텍스트
pub const NO_WEB_RESULTS: &str = "No web results found.";

// ============================================================================
// WebSearch Trait
// ============================================================================

/// 웹 검색 프로바이더 트레이트
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// 질의 → 결과 텍스트
    async fn search(&self, query: &str) -> Result<String>;

    /// 프로바이더 이름
    fn name(&self) -> &str;
}

/// 검색 결과 한 건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

// ============================================================================
// DuckDuckGo
// ============================================================================

/// DuckDuckGo HTML 검색
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    max_results: usize,
}

impl DuckDuckGoSearch {
    /// 새 검색기 생성
    pub fn new(max_results: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("meditech-advisor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        Ok(Self {
            client,
            max_results,
        })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<String> {
        tracing::info!("Web search: {}", query);

        let response = self
            .client
            .get(DUCKDUCKGO_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await
            .context("HTTP 요청 실패")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("DuckDuckGo returned HTTP {}", status);
        }

        let html = response.text().await.context("응답 본문 읽기 실패")?;
        let results = parse_results(&html, self.max_results);
        tracing::debug!("Parsed {} web results", results.len());

        Ok(format_results(&results))
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// 결과 페이지 HTML 파싱
pub fn parse_results(html: &str, max_results: usize) -> Vec<WebResult> {
    let document = Html::parse_document(html);

    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };

    document
        .select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let title = element_text(&link);
            let href = link.value().attr("href")?;
            if title.is_empty() {
                return None;
            }

            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(|s| element_text(&s))
                .unwrap_or_default();

            Some(WebResult {
                title,
                url: resolve_link(href),
                snippet,
            })
        })
        .take(max_results)
        .collect()
}

/// 요소 텍스트 (연속 공백 정리)
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// DuckDuckGo 리다이렉트 링크(`//duckduckgo.com/l/?uddg=...`)에서 원래 URL 추출
pub fn resolve_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        Err(_) => absolute,
    }
}

/// 결과 목록 → 프롬프트용 텍스트
pub fn format_results(results: &[WebResult]) -> String {
    if results.is_empty() {
        return NO_WEB_RESULTS.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut block = format!("{}. {}\n   URL: {}", i + 1, r.title, r.url);
            if !r.snippet.is_empty() {
                block.push_str(&format!("\n   {}", r.snippet));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Tests
// ============================================================================
