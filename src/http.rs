use std::io::Read;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::config::HttpSettings;

const USER_AGENT: &str = concat!("watchlist/", env!("CARGO_PKG_VERSION"));
const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

fn should_retry_http_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..=599).contains(&status)
}

/// Blocking GET client shared by the poster lookups and the artwork fetcher.
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    attempts: usize,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(settings.timeout)
            .timeout_read(settings.timeout)
            .timeout_write(settings.timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            attempts: settings.attempts.max(1),
            retry_delay: settings.retry_delay,
        }
    }

    pub fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, String> {
        self.get_with_retries(url, query, |response| {
            response
                .into_string()
                .map_err(|err| format!("request failed: response decode failed: {err}"))
        })
    }

    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, String> {
        self.get_with_retries(url, &[], |response| {
            let mut body = Vec::new();
            response
                .into_reader()
                .take(MAX_BODY_BYTES)
                .read_to_end(&mut body)
                .map_err(|err| format!("request failed: body read failed: {err}"))?;
            Ok(body)
        })
    }

    fn get_with_retries<T>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        read_body: impl Fn(ureq::Response) -> Result<T, String>,
    ) -> Result<T, String> {
        let attempts = self.attempts;

        for attempt in 1..=attempts {
            let mut request = self.agent.get(url);
            for (key, value) in query {
                request = request.query(key, value);
            }

            match request.call() {
                Ok(response) => return read_body(response),
                Err(ureq::Error::Status(status, response)) => {
                    let response_body = response.into_string().ok().unwrap_or_default();
                    let body = response_body.trim();
                    let status_error = if body.is_empty() {
                        format!("HTTP status {status}")
                    } else {
                        let truncated = body.chars().take(240).collect::<String>();
                        format!("HTTP status {status} ({truncated})")
                    };

                    if should_retry_http_status(status) && attempt < attempts {
                        debug!(url, attempt, status, "retrying after retryable status");
                        thread::sleep(self.retry_delay);
                        continue;
                    }

                    if should_retry_http_status(status) {
                        return Err(format!(
                            "request failed after {attempts} attempt(s): {status_error}"
                        ));
                    }

                    return Err(format!("request failed: {status_error}"));
                }
                Err(ureq::Error::Transport(err)) => {
                    let transport_error = format!("transport error: {err}");
                    if attempt < attempts {
                        debug!(url, attempt, error = %err, "retrying after transport error");
                        thread::sleep(self.retry_delay);
                        continue;
                    }
                    return Err(format!(
                        "request failed after {attempts} attempt(s): {transport_error}"
                    ));
                }
            }
        }

        Err("request failed: exhausted attempts without a concrete error".to_string())
    }
}
