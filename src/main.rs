use std::process::ExitCode;

use anyhow::Context;
use askai::logging::init_logging;
use askai::services::diagnostics::{DEFAULT_CHECK_QUESTION, Diagnostics};
use askai::services::chat_api_http::HttpChatApi;
use askai::services::settings::AppConfig;
use askai::{build_ask_ai, load_app_config, log_config};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};

/// askai - ask the portfolio AI assistant from the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Chat backend base URL or relative path (overrides RAG_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one or more questions; answers are printed in order
    Ask {
        #[arg(required = true)]
        questions: Vec<String>,
    },
    /// Read questions from stdin, one per line
    Chat,
    /// Query the backend health endpoint
    Health,
    /// Ask the backend to load its models
    Warmup,
    /// Run health, warmup and one real question against the backend
    Check {
        #[arg(short, long, default_value = DEFAULT_CHECK_QUESTION)]
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from `.env` file into std::env (optional)
    dotenv().ok();

    let args = Args::parse();

    let mut cfg = load_app_config(args.config.as_deref())?;
    if let Some(url) = args.base_url {
        cfg.chat.base_url = Some(url);
    }
    let _log_guard = init_logging(cfg.logging.as_ref());
    log_config(&cfg);

    match args.command {
        Command::Ask { questions } => {
            let ai = build_ask_ai(&cfg).context("failed to build chat client")?;
            for answer in ai.ask_all(&questions).await {
                println!("{}", answer);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Chat => run_chat(&cfg).await,
        Command::Health => {
            let api = http_api(&cfg)?;
            match api.health().await {
                Ok(h) => {
                    println!("status: {}", h.status.as_deref().unwrap_or("unknown"));
                    println!("rag_enabled: {}", h.rag_enabled.map_or("unknown".to_string(), |r| r.to_string()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("health check failed: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Warmup => {
            let api = http_api(&cfg)?;
            match api.warmup().await {
                Ok(w) => {
                    println!("{}", w.message.as_deref().unwrap_or("No message"));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("warmup failed: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Check { question } => {
            let diagnostics = Diagnostics::builder().api(http_api(&cfg)?).build();
            let report = diagnostics.check(&question).await;
            println!("{}", report);
            Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn http_api(cfg: &AppConfig) -> anyhow::Result<HttpChatApi> {
    HttpChatApi::from_config(&cfg.chat).context("failed to build HTTP client")
}

async fn run_chat(cfg: &AppConfig) -> anyhow::Result<ExitCode> {
    let ai = build_ask_ai(cfg).context("failed to build chat client")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }
        println!("{}", ai.ask(question).await);
    }
    Ok(ExitCode::SUCCESS)
}
