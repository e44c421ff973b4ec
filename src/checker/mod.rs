/*!
 * Grammar checking of subtitle dialogue.
 *
 * This module contains the filtering and adjudication layer between the
 * subtitle document and the grammar engine:
 * - `normalizer`: markup stripping and line break collapsing
 * - `classifier`: dialogue detection
 * - `filter`: ignore policies
 * - `adjudicator`: cross-line capitalization false positives
 * - `collector`: per-document report and unknown-word collection
 */

pub mod adjudicator;
pub mod classifier;
pub mod collector;
pub mod filter;
pub mod normalizer;

pub use adjudicator::{adjudicate, continues_previous_line, previous_dialogue_event, UPPERCASE_SENTENCE_START};
pub use classifier::{is_dialogue, DialogueClassifier, DEFAULT_DIALOGUE_STYLES};
pub use collector::{display_name, MistakeCollector, MistakeReport};
pub use filter::{filter_matches, IgnorePolicy, DEFAULT_SPELLING_RULE_ID};
pub use normalizer::normalize;
