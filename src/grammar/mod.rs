/*!
 * Grammar engine boundary.
 *
 * The checker only sees the `GrammarEngine` trait and the immutable `Match`
 * record defined here. Implementations:
 * - `languagetool`: LanguageTool HTTP server, remote or spawned locally
 * - `mock`: scripted engine for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::EngineError;

/// One issue reported by the grammar engine for a checked text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Stable rule identifier, e.g. `UPPERCASE_SENTENCE_START`
    pub rule_id: String,
    /// Rule issue type, e.g. `misspelling`, `typographical`
    pub issue_type: String,
    /// Human readable explanation
    pub message: String,
    /// The flagged span of the checked text
    pub matched_text: String,
    /// Excerpt of the checked text around the error
    pub context: String,
    /// Character offset of the error inside `context`
    pub offset_in_context: usize,
    /// Character length of the error inside `context`
    pub error_length: usize,
    /// Suggested replacements, best first
    pub replacements: Vec<String>,
}

impl Match {
    /// Create a match whose context is the matched text itself
    pub fn new(rule_id: impl Into<String>, message: impl Into<String>, matched_text: impl Into<String>) -> Self {
        let matched_text = matched_text.into();
        Self {
            rule_id: rule_id.into(),
            issue_type: String::new(),
            message: message.into(),
            error_length: matched_text.chars().count(),
            context: matched_text.clone(),
            matched_text,
            offset_in_context: 0,
            replacements: Vec::new(),
        }
    }

    /// Set the issue type
    pub fn issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    /// Set the context excerpt and the error position inside it
    pub fn context(mut self, context: impl Into<String>, offset: usize, length: usize) -> Self {
        self.context = context.into();
        self.offset_in_context = offset;
        self.error_length = length;
        self
    }

    /// Set the replacement suggestions
    pub fn replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    /// Split the context into the text before, inside and after the error
    ///
    /// Offsets are clamped to the context so a malformed match never panics.
    pub fn context_parts(&self) -> (&str, &str, &str) {
        let char_count = self.context.chars().count();
        let start = self.offset_in_context.min(char_count);
        let end = (start + self.error_length).min(char_count);

        let byte_at = |chars: usize| {
            self.context
                .char_indices()
                .nth(chars)
                .map(|(i, _)| i)
                .unwrap_or(self.context.len())
        };
        let (start, end) = (byte_at(start), byte_at(end));

        (&self.context[..start], &self.context[start..end], &self.context[end..])
    }
}

/// Common trait for grammar checking backends
///
/// Engines are started by their own constructors and must be released with
/// `shutdown` once the run is over.
#[async_trait]
pub trait GrammarEngine: Send + Sync + Debug {
    /// Check a single plain text and return every issue found, in engine order
    async fn check(&self, text: &str) -> Result<Vec<Match>, EngineError>;

    /// Release the engine; calling it twice is a no-op
    async fn shutdown(&mut self) -> Result<(), EngineError>;
}

pub mod languagetool;
pub mod mock;

pub use languagetool::LanguageTool;
pub use mock::MockEngine;
