use indicatif::ProgressBar;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::checker::adjudicator::adjudicate;
use crate::checker::classifier::DialogueClassifier;
use crate::checker::filter::{filter_matches, IgnorePolicy};
use crate::checker::normalizer::normalize;
use crate::errors::EngineError;
use crate::grammar::{GrammarEngine, Match};
use crate::subtitle_processor::SubtitleDocument;

// @module: Per-document mistake collection

/// Surviving matches of one file, keyed by 1-based event line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MistakeReport {
    /// File the report describes
    pub source_file: PathBuf,
    /// Line number to matches, in line order
    pub lines: BTreeMap<usize, Vec<Match>>,
}

impl MistakeReport {
    /// Create an empty report for `source_file`
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            source_file: source_file.into(),
            lines: BTreeMap::new(),
        }
    }

    /// Record the matches of a line; empty lists are not recorded
    pub fn insert(&mut self, line_number: usize, matches: Vec<Match>) {
        if !matches.is_empty() {
            self.lines.insert(line_number, matches);
        }
    }

    /// No mistakes at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines with at least one mistake
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of mistakes over all lines
    pub fn mistake_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }

    /// Matches of a line, if any survived
    pub fn line(&self, line_number: usize) -> Option<&[Match]> {
        self.lines.get(&line_number).map(Vec::as_slice)
    }

    /// `(line, match)` pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Match)> {
        self.lines
            .iter()
            .flat_map(|(line, matches)| matches.iter().map(move |m| (*line, m)))
    }
}

/// Runs normalize, check, filter and adjudicate over a document
pub struct MistakeCollector<'a> {
    engine: &'a dyn GrammarEngine,
    policy: &'a IgnorePolicy,
    classifier: &'a DialogueClassifier,
}

impl<'a> MistakeCollector<'a> {
    pub fn new(
        engine: &'a dyn GrammarEngine,
        policy: &'a IgnorePolicy,
        classifier: &'a DialogueClassifier,
    ) -> Self {
        Self { engine, policy, classifier }
    }

    /// Collect the reportable mistakes of a document in its current event order
    ///
    /// Line numbers count every event, dialogue or not, so they match the
    /// order of the events as written to disk.
    pub async fn subtitle_mistakes(
        &self,
        document: &SubtitleDocument,
        progress: Option<&ProgressBar>,
    ) -> Result<MistakeReport, EngineError> {
        let events = &document.events;
        let mut report = MistakeReport::new(&document.source_file);

        for (index, event) in events.iter().enumerate() {
            if let Some(pb) = progress {
                pb.inc(1);
            }
            if !self.classifier.is_dialogue(event) {
                continue;
            }

            let text = normalize(&event.text);
            let matches = self.engine.check(&text).await?;
            let matches = filter_matches(matches, self.policy);
            let matches = adjudicate(matches, index, events, self.classifier);

            if !matches.is_empty() {
                debug!("Line {}: {} mistake(s)", index + 1, matches.len());
            }
            report.insert(index + 1, matches);
        }

        Ok(report)
    }

    /// Add every word the engine flags as misspelled to `words`
    ///
    /// No ignore policy is applied; the result is meant for building one.
    pub async fn unknown_words(
        &self,
        document: &SubtitleDocument,
        words: &mut BTreeSet<String>,
    ) -> Result<(), EngineError> {
        for event in &document.events {
            if !self.classifier.is_dialogue(event) {
                continue;
            }

            let matches = self.engine.check(&normalize(&event.text)).await?;
            words.extend(
                matches
                    .into_iter()
                    .filter(|m| self.policy.is_spelling(m))
                    .map(|m| m.matched_text),
            );
        }

        Ok(())
    }
}

/// File name used as a report heading
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
