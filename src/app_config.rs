use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::checker::{DialogueClassifier, IgnorePolicy};
use crate::file_utils::FileManager;
use crate::language_utils;

// @module: Application configuration, loaded from JSON and merged with CLI flags

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// LanguageTool locale, e.g. "en-US"
    #[serde(default = "default_language")]
    pub language: String,

    /// Suppression settings
    #[serde(default)]
    pub ignore: IgnoreConfig,

    /// Grammar engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Style name prefixes that mark an event as spoken dialogue
    #[serde(default = "default_dialogue_styles")]
    pub dialogue_styles: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What to leave out of the report
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct IgnoreConfig {
    /// Rule identifiers to ignore, any case
    #[serde(default)]
    pub rules: Vec<String>,

    /// Rule issue types to ignore, any case
    #[serde(default)]
    pub categories: Vec<String>,

    /// Words never reported as misspelled, any case
    #[serde(default)]
    pub words: Vec<String>,

    /// Optional file with one ignored word per line
    #[serde(default)]
    pub words_file: Option<PathBuf>,

    /// Drop every spelling match
    #[serde(default)]
    pub spelling: bool,

    /// Drop matches about informal language
    #[serde(default)]
    pub informal: bool,

    /// Spelling rule identifier, derived from the language when unset
    #[serde(default)]
    pub spelling_rule_id: Option<String>,
}

/// LanguageTool server settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Server URL; a spawned local server listens on its port
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// languagetool-server.jar to start locally instead of using a running server
    #[serde(default)]
    pub server_jar: Option<PathBuf>,

    /// Java executable used to start the local server
    #[serde(default = "default_java_command")]
    pub java_command: String,

    /// How long to wait for a local server to come up
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff base for retries (in milliseconds)
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            server_jar: None,
            java_command: default_java_command(),
            startup_timeout_secs: default_startup_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_dialogue_styles() -> Vec<String> {
    vec!["Dialogue".to_string(), "main".to_string(), "Default".to_string()]
}

fn default_endpoint() -> String {
    "http://localhost:8081".to_string()
}

fn default_java_command() -> String {
    "java".to_string()
}

fn default_startup_timeout_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    500
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_locale(&self.language)?;

        let endpoint = Url::parse(&self.engine.endpoint)
            .with_context(|| format!("Invalid LanguageTool endpoint: {}", self.engine.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("LanguageTool endpoint must use http or https: {}", endpoint));
        }

        if self.dialogue_styles.is_empty() || self.dialogue_styles.iter().any(|s| s.is_empty()) {
            return Err(anyhow!("dialogue_styles must contain non-empty style prefixes"));
        }

        if let Some(jar) = &self.engine.server_jar {
            if !FileManager::file_exists(jar) {
                return Err(anyhow!("LanguageTool server jar not found: {:?}", jar));
            }
        }

        Ok(())
    }

    /// Spelling rule identifier for the configured language
    pub fn spelling_rule_id(&self) -> String {
        self.ignore
            .spelling_rule_id
            .clone()
            .unwrap_or_else(|| language_utils::spelling_rule_id(&self.language))
    }

    /// Classifier accepting the configured dialogue style prefixes
    pub fn dialogue_classifier(&self) -> DialogueClassifier {
        DialogueClassifier::new(self.dialogue_styles.iter().cloned())
    }

    /// Build the ignore policy, reading the ignore-words file if one is set
    pub fn ignore_policy(&self) -> Result<IgnorePolicy> {
        let mut words: HashSet<String> = self.ignore.words.iter().cloned().collect();
        if let Some(words_file) = &self.ignore.words_file {
            words.extend(FileManager::read_word_list(words_file)?);
        }

        Ok(IgnorePolicy::new(
            self.ignore.rules.iter(),
            self.ignore.categories.iter(),
            words.iter(),
            self.ignore.spelling,
            self.ignore.informal,
            self.spelling_rule_id(),
        ))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            ignore: IgnoreConfig::default(),
            engine: EngineConfig::default(),
            dialogue_styles: default_dialogue_styles(),
            log_level: LogLevel::default(),
        }
    }
}
