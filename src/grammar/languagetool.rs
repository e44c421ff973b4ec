use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use url::Url;

use crate::app_config::EngineConfig;
use crate::errors::EngineError;
use crate::grammar::{GrammarEngine, Match};

// @const: Delay between readiness checks of a starting server
const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);

// @const: Upper bound for a single retry delay
const MAX_BACKOFF: Duration = Duration::from_secs(60);

// @const: Main class of the LanguageTool HTTP server
const SERVER_MAIN_CLASS: &str = "org.languagetool.server.HTTPServer";

/// LanguageTool client, optionally owning a locally spawned server
#[derive(Debug)]
pub struct LanguageTool {
    /// Base URL of the server, without trailing slash
    base_url: String,
    /// Locale sent with every check
    language: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Local server process, if this handle started one
    server: Option<Child>,
    running: bool,
}

/// Body of a `/v2/check` response
#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    message: String,
    #[serde(default)]
    replacements: Vec<WireReplacement>,
    offset: usize,
    length: usize,
    context: WireContext,
    rule: WireRule,
}

#[derive(Debug, Deserialize)]
struct WireReplacement {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct WireContext {
    text: String,
    offset: usize,
    length: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRule {
    id: String,
    #[serde(default)]
    issue_type: String,
}

impl LanguageTool {
    /// Connect to the configured server, spawning it first when a jar is configured
    pub async fn start(config: &EngineConfig, language: &str) -> Result<Self, EngineError> {
        let base_url = config.endpoint.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Startup(format!("Failed to build HTTP client: {}", e)))?;

        let server = match &config.server_jar {
            Some(jar) => Some(Self::spawn_server(config, &jar.to_string_lossy(), &base_url)?),
            None => None,
        };

        let mut engine = Self {
            base_url,
            language: language.to_string(),
            client,
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
            server,
            running: true,
        };

        let startup_timeout = Duration::from_secs(config.startup_timeout_secs);
        if let Err(e) = engine.wait_until_ready(startup_timeout).await {
            if let Err(shutdown_error) = engine.shutdown().await {
                warn!("{}", shutdown_error);
            }
            return Err(e);
        }

        info!("LanguageTool ready at {} ({})", engine.base_url, engine.language);
        Ok(engine)
    }

    /// Create a client for an already running server without probing it
    pub fn from_url(url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            language: language.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 0,
            backoff_base_ms: 100,
            server: None,
            running: true,
        }
    }

    /// Set the retry policy
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Locale sent with every check
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether this handle started its own server process
    pub fn owns_server(&self) -> bool {
        self.server.is_some()
    }

    fn spawn_server(config: &EngineConfig, jar: &str, base_url: &str) -> Result<Child, EngineError> {
        let url = Url::parse(base_url)
            .map_err(|e| EngineError::Startup(format!("Invalid endpoint {}: {}", base_url, e)))?;
        let port = url.port_or_known_default().unwrap_or(8081).to_string();

        info!("Starting local LanguageTool server on port {}", port);
        Command::new(&config.java_command)
            .args(["-cp", jar, SERVER_MAIN_CLASS, "--port", &port, "--allow-origin", "*"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Startup(format!("Failed to launch {}: {}", config.java_command, e)))
    }

    // @polls: /v2/languages until the server answers; a remote server is asked once
    async fn wait_until_ready(&mut self, timeout: Duration) -> Result<(), EngineError> {
        let url = format!("{}/v2/languages", self.base_url);
        let deadline = Instant::now() + timeout;

        loop {
            let last_error = match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => format!("status {}", response.status()),
                Err(e) => e.to_string(),
            };

            match self.server.as_mut() {
                None => {
                    return Err(EngineError::Startup(format!(
                        "LanguageTool server at {} is not reachable: {}",
                        self.base_url, last_error
                    )));
                }
                Some(child) => {
                    if let Ok(Some(status)) = child.try_wait() {
                        return Err(EngineError::Startup(format!(
                            "LanguageTool server exited during startup ({})",
                            status
                        )));
                    }
                }
            }

            if Instant::now() >= deadline {
                return Err(EngineError::Startup(format!(
                    "LanguageTool server did not start within {}s: {}",
                    timeout.as_secs(),
                    last_error
                )));
            }

            debug!("Waiting for LanguageTool server: {}", last_error);
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl GrammarEngine for LanguageTool {
    async fn check(&self, text: &str) -> Result<Vec<Match>, EngineError> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v2/check", self.base_url);
        let mut attempt = 0;

        loop {
            let response_result = self
                .client
                .post(&url)
                .form(&[("language", self.language.as_str()), ("text", text)])
                .send()
                .await;

            let error = match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            EngineError::RequestFailed(format!("Failed to read response body: {}", e))
                        })?;
                        return parse_check_response(text, &body);
                    }

                    let message = response.text().await.unwrap_or_default();
                    let error = EngineError::ApiError {
                        status_code: status.as_u16(),
                        message,
                    };
                    // Client errors will not go away by retrying
                    if !status.is_server_error() {
                        return Err(error);
                    }
                    error
                }
                Err(e) if e.is_connect() => EngineError::ConnectionError(e.to_string()),
                Err(e) => EngineError::RequestFailed(e.to_string()),
            };

            if attempt >= self.max_retries {
                return Err(error);
            }

            let delay = backoff_delay(self.backoff_base_ms, attempt);
            warn!("{} (retrying in {}ms)", error, delay.as_millis());
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        self.running = false;

        if let Some(mut child) = self.server.take() {
            info!("Stopping local LanguageTool server");
            child
                .kill()
                .await
                .map_err(|e| EngineError::Shutdown(e.to_string()))?;
        }

        Ok(())
    }
}

// @returns: Exponential backoff for the given retry, capped at MAX_BACKOFF
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor)).min(MAX_BACKOFF)
}

/// Map a `/v2/check` JSON body to matches against the checked text
fn parse_check_response(text: &str, body: &str) -> Result<Vec<Match>, EngineError> {
    let response: CheckResponse = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        EngineError::ParseError(format!("{} in response: {}", e, preview))
    })?;

    Ok(response
        .matches
        .into_iter()
        .map(|wire| {
            let (context_offset, context_length) =
                utf16_char_span(&wire.context.text, wire.context.offset, wire.context.length);
            let (offset, length) = utf16_char_span(text, wire.offset, wire.length);

            Match {
                rule_id: wire.rule.id,
                issue_type: wire.rule.issue_type,
                message: wire.message,
                matched_text: text.chars().skip(offset).take(length).collect(),
                context: wire.context.text,
                offset_in_context: context_offset,
                error_length: context_length,
                replacements: wire.replacements.into_iter().map(|r| r.value).collect(),
            }
        })
        .collect())
}

/// Convert a UTF-16 offset/length pair (as LanguageTool reports them) to characters
fn utf16_char_span(text: &str, offset: usize, length: usize) -> (usize, usize) {
    let end_units = offset + length;
    let mut units = 0;
    let mut start = None;
    let mut end = None;

    for (index, c) in text.chars().enumerate() {
        if start.is_none() && units >= offset {
            start = Some(index);
        }
        if units >= end_units {
            end = Some(index);
            break;
        }
        units += c.len_utf16();
    }

    let char_count = text.chars().count();
    let start = start.unwrap_or(char_count);
    let end = end.unwrap_or(char_count).max(start);
    (start, end - start)
}
