//! CLI 모듈
//!
//! meditech-advisor CLI 명령어 정의 및 구현

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::advisor::Advisor;
use crate::collector::PdfCollector;
use crate::llm::{self, GroqChat, LanguageModel};
use crate::search::{PdfSearchTool, Vocabulary};
use crate::websearch::{DuckDuckGoSearch, WebSearch, DEFAULT_MAX_RESULTS};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "meditech-advisor")]
#[command(version, about = "PDF + 웹 검색 기반 의료기기 질의응답", long_about = None)]
pub struct Cli {
    /// 불용어/도메인 키워드 JSON 파일
    #[arg(long, global = true)]
    pub vocabulary: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// PDF 입력 옵션
#[derive(Args, Debug, Default)]
pub struct PdfInputs {
    /// 검색할 PDF 파일 (여러 번 지정 가능)
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// PDF를 재귀 수집할 폴더
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// PDF와 웹 검색 결과를 바탕으로 질문에 답변
    Ask {
        /// 질문
        question: String,

        #[command(flatten)]
        inputs: PdfInputs,

        /// 웹 검색 결과 개수
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        web_results: usize,

        /// 모델 ID (기본: MEDITECH_MODEL 또는 llama-3.3-70b-versatile)
        #[arg(short, long)]
        model: Option<String>,

        /// 웹 검색 생략
        #[arg(long)]
        no_web: bool,

        /// 모델을 호출하지 않고 프롬프트만 출력
        #[arg(long)]
        prompt_only: bool,

        /// 답변 앞에 프롬프트 출력
        #[arg(long)]
        show_prompt: bool,
    },

    /// PDF 관련도 검색 결과만 출력
    Search {
        /// 검색 쿼리
        query: String,

        #[command(flatten)]
        inputs: PdfInputs,
    },

    /// 쿼리에서 추출되는 매칭 용어 출력
    Terms {
        /// 검색 쿼리
        query: String,
    },

    /// 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let vocabulary = load_vocabulary(cli.vocabulary.as_deref())?;

    match cli.command {
        Commands::Ask {
            question,
            inputs,
            web_results,
            model,
            no_web,
            prompt_only,
            show_prompt,
        } => {
            let options = AskOptions {
                web_results,
                model,
                no_web,
                prompt_only,
                show_prompt,
            };
            cmd_ask(&question, inputs, vocabulary, options).await
        }
        Commands::Search { query, inputs } => cmd_search(&query, inputs, vocabulary).await,
        Commands::Terms { query } => cmd_terms(&query, vocabulary),
        Commands::Status => cmd_status(),
    }
}

fn load_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    match path {
        Some(path) => Vocabulary::from_file(path),
        None => Ok(Vocabulary::default()),
    }
}

fn collect_pdfs(inputs: &PdfInputs) -> Result<Vec<PathBuf>> {
    PdfCollector::with_defaults()
        .collect(&inputs.files, inputs.dir.as_deref())
        .context("PDF 수집 실패")
}

// ============================================================================
// Command Implementations
// ============================================================================

struct AskOptions {
    web_results: usize,
    model: Option<String>,
    no_web: bool,
    prompt_only: bool,
    show_prompt: bool,
}

/// 질의응답 명령어 (ask)
async fn cmd_ask(
    question: &str,
    inputs: PdfInputs,
    vocabulary: Vocabulary,
    options: AskOptions,
) -> Result<()> {
    let model: Option<Box<dyn LanguageModel>> = if options.prompt_only {
        None
    } else {
        if !llm::has_api_key() {
            bail!(
                "API 키가 설정되지 않았습니다.\n\
                 설정: export GROQ_API_KEY=your-key\n\
                 (모델 호출 없이 프롬프트만 보려면 --prompt-only)"
            );
        }
        Some(Box::new(
            GroqChat::from_env(options.model).context("언어 모델 초기화 실패")?,
        ))
    };

    let web: Option<Box<dyn WebSearch>> = if options.no_web {
        None
    } else {
        Some(Box::new(
            DuckDuckGoSearch::new(options.web_results).context("웹 검색 초기화 실패")?,
        ))
    };

    let pdf_paths = collect_pdfs(&inputs)?;
    if !pdf_paths.is_empty() {
        eprintln!("[*] PDF {} 개에서 관련 내용 검색 중...", pdf_paths.len());
    }

    let advisor = Advisor::new(PdfSearchTool::with_vocabulary(vocabulary), web, model);
    let answer = advisor.ask(question, pdf_paths).await?;

    match answer.content {
        Some(content) => {
            if options.show_prompt {
                println!("{}", answer.prompt);
                println!("{}", "-".repeat(50));
            }
            println!("{}", content);
        }
        None => println!("{}", answer.prompt),
    }

    Ok(())
}

/// PDF 검색 명령어 (search)
async fn cmd_search(query: &str, inputs: PdfInputs, vocabulary: Vocabulary) -> Result<()> {
    let pdf_paths = collect_pdfs(&inputs)?;
    if pdf_paths.is_empty() {
        bail!("--file 또는 --dir로 검색할 PDF를 지정해야 합니다");
    }

    let advisor = Advisor::new(PdfSearchTool::with_vocabulary(vocabulary), None, None);
    let result = advisor.search_pdfs(query, pdf_paths).await?;
    println!("{}", result);

    Ok(())
}

/// 용어 추출 명령어 (terms)
fn cmd_terms(query: &str, vocabulary: Vocabulary) -> Result<()> {
    let tool = PdfSearchTool::with_vocabulary(vocabulary);
    let terms = tool.analyzer().extract_key_terms(query);

    if terms.is_empty() {
        println!("[!] 추출된 용어가 없습니다.");
        return Ok(());
    }

    for term in terms.iter() {
        println!("{}", term);
    }

    Ok(())
}

/// 상태 명령어 (status)
fn cmd_status() -> Result<()> {
    println!("meditech-advisor v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if llm::has_api_key() {
        println!("[OK] API 키: 설정됨");
    } else {
        println!("[!] API 키: 미설정");
        println!("    설정: export GROQ_API_KEY=your-key");
    }

    println!("[*] 모델: {}", llm::resolve_model(None));

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "meditech-advisor",
            "ask",
            "What is ISO 13485?",
            "--file",
            "a.pdf",
            "-f",
            "b.pdf",
            "--no-web",
            "--prompt-only",
        ])
        .expect("parse");

        match cli.command {
            Commands::Ask {
                question,
                inputs,
                no_web,
                prompt_only,
                web_results,
                ..
            } => {
                assert_eq!(question, "What is ISO 13485?");
                assert_eq!(inputs.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
                assert!(no_web);
                assert!(prompt_only);
                assert_eq!(web_results, DEFAULT_MAX_RESULTS);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_global_vocabulary() {
        let cli = Cli::try_parse_from(["meditech-advisor", "terms", "mri", "--vocabulary", "v.json"])
            .expect("parse");
        assert_eq!(cli.vocabulary, Some(PathBuf::from("v.json")));
    }

    #[test]
    fn test_load_vocabulary_default() {
        let vocab = load_vocabulary(None).expect("default");
        assert!(vocab.is_stop_word("the"));
    }
}
