use anyhow::Result;
use clap::Parser;
use common::Config;
use env_logger::Env;
use log::{error, info, warn};

mod analyzer;
mod llm;
mod prompt;
mod report;
mod retry;

use analyzer::AnalyzeError;
use llm::LlmClient;

#[derive(Parser, Debug)]
#[command(name = "analyze", about = "Analyze server logs for cyber threats using AI")]
struct Args {
    /// Path to the log file to analyze (default: server_logs.txt)
    #[arg(short, long)]
    file: Option<String>,

    /// Path to save the JSON report (optional)
    #[arg(short, long)]
    output: Option<String>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?;

    let api_key = std::env::var(&config.llm.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        warn!(
            "{} is not set; the completion service will likely reject the request",
            config.llm.api_key_env
        );
    }

    let client = LlmClient::new(&config.llm, api_key);
    info!("Analyzing logs via {} ({})", config.llm.base_url, client.model());

    let log_path = args.file.unwrap_or_else(|| config.analyzer.log_file.clone());

    // Failures are operator-reported through the logger; the process exits 0
    // on every documented path, success or not.
    if let Err(e) = analyzer::run(
        &client,
        &log_path,
        args.output.as_deref(),
        config.llm.max_retries,
    )
    .await
    {
        report_failure(e);
    }

    Ok(())
}

fn report_failure(err: AnalyzeError) {
    match err {
        AnalyzeError::InputNotFound { path, .. } => {
            error!("Could not find {}", path);
        }
        AnalyzeError::RateLimitExhausted { attempts, message } => {
            error!("Rate limited after {} attempts.", attempts);
            error!("Service message: {}", message);
            warn!("Please try again in a few minutes or switch to a different model.");
        }
        AnalyzeError::MalformedResponse { raw } => {
            error!("The model failed to return valid JSON. Raw output:");
            error!("{}", raw);
        }
        AnalyzeError::Completion(source) => {
            error!("Completion call failed: {}", source);
        }
        AnalyzeError::OutputWrite { path, source } => {
            error!("Could not write report to {}: {}", path, source);
        }
    }
}
