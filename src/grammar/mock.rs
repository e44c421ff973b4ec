/*!
 * Mock grammar engine for testing.
 *
 * Returns scripted matches per checked text, records every call and counts
 * shutdowns so tests can assert on engine lifecycle:
 * - `MockEngine::new()` - answers scripted texts, no matches otherwise
 * - `MockEngine::failing()` - every check fails with a connection error
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::EngineError;
use crate::grammar::{GrammarEngine, Match};

/// Behavior mode for the mock engine
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Answers from the scripted responses
    Scripted,
    /// Fails every check
    Failing,
    /// Fails when checking this exact text, answers the rest
    FailOn(String),
}

/// Mock engine for testing checker behavior
#[derive(Debug)]
pub struct MockEngine {
    behavior: MockBehavior,
    responses: HashMap<String, Vec<Match>>,
    calls: Arc<Mutex<Vec<String>>>,
    shutdowns: Arc<AtomicUsize>,
    running: bool,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// Create an engine that answers scripted texts
    pub fn new() -> Self {
        Self {
            behavior: MockBehavior::Scripted,
            responses: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            shutdowns: Arc::new(AtomicUsize::new(0)),
            running: true,
        }
    }

    /// Create an engine whose checks always fail
    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing,
            ..Self::new()
        }
    }

    /// Script the matches returned for `text`
    pub fn with_response(mut self, text: impl Into<String>, matches: Vec<Match>) -> Self {
        self.responses.insert(text.into(), matches);
        self
    }

    /// Fail only when `text` is checked
    pub fn fail_on(mut self, text: impl Into<String>) -> Self {
        self.behavior = MockBehavior::FailOn(text.into());
        self
    }

    /// Texts checked so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Shared call log, still readable after the engine moved
    pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    /// Shared shutdown counter, still readable after the engine moved
    pub fn shutdown_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.shutdowns)
    }

    /// Whether shutdown has not been called yet
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[async_trait]
impl GrammarEngine for MockEngine {
    async fn check(&self, text: &str) -> Result<Vec<Match>, EngineError> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }

        match &self.behavior {
            MockBehavior::Failing => Err(EngineError::ConnectionError("mock engine offline".to_string())),
            MockBehavior::FailOn(failing) if failing == text => {
                Err(EngineError::ApiError { status_code: 500, message: "mock failure".to_string() })
            }
            _ => Ok(self.responses.get(text).cloned().unwrap_or_default()),
        }
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        if self.running {
            self.running = false;
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
