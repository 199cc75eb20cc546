use crate::analyzer::AnalyzeError;
use crate::llm::{Completion, CompletionError};
use log::warn;
use tokio::time::{sleep, Duration};

/// Bounded retry around the completion call. `max_retries` is the total
/// attempt ceiling; only a rate-limit signal is retried, with 1s, 2s, 4s, ...
/// backoff between attempts. Any other failure aborts immediately.
pub async fn complete_with_retry<C: Completion>(
    client: &C,
    prompt: &str,
    max_retries: u32,
) -> Result<String, AnalyzeError> {
    let mut last_message = String::new();
    for attempt in 0..max_retries {
        match client.complete(prompt).await {
            Ok(text) => return Ok(text),
            Err(CompletionError::RateLimited { message }) => {
                last_message = message;
                if attempt + 1 < max_retries {
                    let wait = Duration::from_secs(1u64 << attempt);
                    warn!(
                        "Rate limited. Waiting {} seconds before retry {}/{}...",
                        wait.as_secs(),
                        attempt + 1,
                        max_retries - 1
                    );
                    sleep(wait).await;
                }
            }
            Err(other) => return Err(AnalyzeError::Completion(other)),
        }
    }
    Err(AnalyzeError::RateLimitExhausted {
        attempts: max_retries,
        message: last_message,
    })
}
