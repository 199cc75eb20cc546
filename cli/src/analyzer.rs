use crate::llm::{Completion, CompletionError};
use crate::prompt::build_prompt;
use crate::report::{parse_report, render_pretty, write_report};
use crate::retry::complete_with_retry;
use log::info;
use std::path::Path;
use thiserror::Error;

/// Run-level failure taxonomy. Every variant ends the run; main decides how
/// each one is reported to the operator.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("could not read log file {path}")]
    InputNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rate limited after {attempts} attempts")]
    RateLimitExhausted { attempts: u32, message: String },

    #[error("the model failed to return valid JSON")]
    MalformedResponse { raw: String },

    /// Non-rate-limit completion failure. Not retried; logged distinctly from
    /// both rate-limit exhaustion and malformed JSON.
    #[error("completion call failed")]
    Completion(#[source] CompletionError),

    #[error("could not write report to {path}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One full analysis pass: read the log file, send it to the model through the
/// retry controller, validate the reply as JSON, print and optionally persist
/// the report.
pub async fn run<C: Completion>(
    client: &C,
    log_path: &str,
    output_path: Option<&str>,
    max_retries: u32,
) -> Result<(), AnalyzeError> {
    info!("Reading logs from {}...", log_path);
    let logs = read_logs(log_path).await?;

    let prompt = build_prompt(&logs);
    let raw = complete_with_retry(client, &prompt, max_retries).await?;

    let report = parse_report(&raw).map_err(|_| AnalyzeError::MalformedResponse {
        raw: raw.clone(),
    })?;

    info!("Cyber Threat Intelligence Report:");
    info!("{}", render_pretty(&report));
    for finding in report.findings() {
        info!(
            "  {} [{}] {}",
            finding.ip_address, finding.risk_level, finding.vulnerability_type
        );
    }

    if let Some(path) = output_path {
        write_report(&report, Path::new(path)).map_err(|source| AnalyzeError::OutputWrite {
            path: path.to_string(),
            source,
        })?;
        info!("Report saved to {}", path);
    }

    Ok(())
}

// Missing or unreadable both surface as InputNotFound; the run ends before any
// network call happens.
async fn read_logs(path: &str) -> Result<String, AnalyzeError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AnalyzeError::InputNotFound {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;

    struct Fixed {
        calls: Cell<u32>,
        reply: &'static str,
    }

    impl Fixed {
        fn new(reply: &'static str) -> Self {
            Self {
                calls: Cell::new(0),
                reply,
            }
        }
    }

    impl Completion for Fixed {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.reply.to_string())
        }
    }

    struct Unreachable;

    impl Completion for Unreachable {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            panic!("completion must not be called");
        }
    }

    #[tokio::test]
    async fn missing_log_file_reports_input_not_found_without_network() {
        let result = run(&Unreachable, "/definitely/not/here.txt", None, 3).await;
        assert!(matches!(result, Err(AnalyzeError::InputNotFound { .. })));
    }

    #[tokio::test]
    async fn read_logs_returns_file_contents_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let contents = "10.0.0.1 - - [01/Jan/2026] \"GET / HTTP/1.1\" 200\nsecond line\n";
        fs::write(&path, contents).unwrap();

        let logs = read_logs(path.to_str().unwrap()).await.unwrap();
        assert_eq!(logs, contents);
    }

    #[tokio::test]
    async fn valid_reply_writes_report_to_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("access.log");
        fs::write(&log_path, "10.0.0.1 - GET /admin\n").unwrap();
        let out_path = dir.path().join("report.json");

        let backend = Fixed::new("{\"threats_detected\": []}");
        run(
            &backend,
            log_path.to_str().unwrap(),
            Some(out_path.to_str().unwrap()),
            3,
        )
        .await
        .unwrap();

        assert_eq!(backend.calls.get(), 1);
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({ "threats_detected": [] }));
    }

    #[tokio::test]
    async fn valid_reply_without_output_path_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("access.log");
        fs::write(&log_path, "10.0.0.1 - GET /\n").unwrap();

        let backend = Fixed::new("{\"threats_detected\": []}");
        run(&backend, log_path.to_str().unwrap(), None, 3)
            .await
            .unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn malformed_reply_carries_raw_text_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("access.log");
        fs::write(&log_path, "10.0.0.1 - GET /\n").unwrap();
        let out_path = dir.path().join("report.json");

        let backend = Fixed::new("not json");
        let result = run(
            &backend,
            log_path.to_str().unwrap(),
            Some(out_path.to_str().unwrap()),
            3,
        )
        .await;

        match result {
            Err(AnalyzeError::MalformedResponse { raw }) => assert_eq!(raw, "not json"),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
        assert!(!out_path.exists());
    }
}
