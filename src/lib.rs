/*!
 * # assgrammarcheck - Grammar checker for .ass subtitles
 *
 * A Rust library that checks the dialogue of Advanced SubStation Alpha
 * subtitles with LanguageTool and filters out the false positives caused
 * by subtitle line splitting.
 *
 * ## Features
 *
 * - Strip override blocks and `\N` line breaks before checking
 * - Skip signs, typesetting and commented-out events
 * - Ignore rules, categories, words, spelling or informal language
 * - Drop capitalization warnings on lines that continue the previous
 *   dialogue event
 * - Collect unknown words to build an ignore list
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: .ass reading, sorting and writing
 * - `checker`: Filtering and adjudication between subtitles and the engine:
 *   - `checker::normalizer`: Plain text extraction
 *   - `checker::classifier`: Dialogue detection
 *   - `checker::filter`: Ignore policies
 *   - `checker::adjudicator`: Cross-line false positives
 *   - `checker::collector`: Per-document collection
 * - `grammar`: Grammar engine boundary:
 *   - `grammar::languagetool`: LanguageTool HTTP client and local server
 *   - `grammar::mock`: Scripted engine for tests
 * - `presentation`: Terminal tables and word lists
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Locale utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod checker;
pub mod errors;
pub mod file_utils;
pub mod grammar;
pub mod language_utils;
pub mod presentation;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, Mode, RunSummary};
pub use checker::{IgnorePolicy, MistakeReport};
pub use errors::{AppError, EngineError, SubtitleError};
pub use grammar::{GrammarEngine, LanguageTool, Match, MockEngine};
pub use subtitle_processor::{SubtitleDocument, SubtitleEvent};
