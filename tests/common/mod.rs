/*!
 * Common test utilities for the assgrammarcheck test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use assgrammarcheck::grammar::Match;

/// Header and styles written in front of every generated script
const SCRIPT_HEADER: &str = "[Script Info]
; Script generated by Aegisub
Title: Test
ScriptType: v4.00+
PlayResX: 1920
PlayResY: 1080

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1
Style: Sign,Arial,40,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,8,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Routes library logs to the test output; safe to call from every test
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds the content of a script with the given `(kind, start, style, text)` events
pub fn ass_content(events: &[(&str, &str, &str, &str)]) -> String {
    let mut content = SCRIPT_HEADER.to_string();
    for (kind, start, style, text) in events {
        content.push_str(&format!(
            "{}: 0,{},9:59:59.00,{},,0,0,0,,{}\n",
            kind, start, style, text
        ));
    }
    content
}

/// Creates a script with the given `(kind, start, style, text)` events
pub fn create_test_ass(dir: &Path, filename: &str, events: &[(&str, &str, &str, &str)]) -> Result<PathBuf> {
    create_test_file(dir, filename, &ass_content(events))
}

/// Capitalization match as LanguageTool reports it for a lower-case start
pub fn uppercase_match(word: &str) -> Match {
    let mut capitalized = word.to_string();
    if let Some(first) = capitalized.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Match::new(
        "UPPERCASE_SENTENCE_START",
        "This sentence does not start with an uppercase letter.",
        word,
    )
    .issue_type("typographical")
    .replacements([capitalized])
}

/// Spelling match for the en-US speller
pub fn spelling_match(word: &str) -> Match {
    Match::new("MORFOLOGIK_RULE_EN_US", "Possible spelling mistake found.", word)
        .issue_type("misspelling")
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}
