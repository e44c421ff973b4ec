/*!
 * Text normalization for grammar checking.
 *
 * Turns the raw text of an event into the plain text a viewer reads:
 * override blocks are removed and hard line breaks become single spaces.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Non-greedy override block, so `{a}b{c}` keeps the `b`
static OVERRIDE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{.*?\}").expect("Invalid override block regex")
});

/// Hard line break variants, padded ones first so no stray space survives
const LINE_BREAK_VARIANTS: [&str; 4] = [" \\N ", "\\N ", " \\N", "\\N"];

/// Strip override blocks and collapse `\N` line breaks into single spaces
pub fn normalize(raw: &str) -> String {
    let mut output = OVERRIDE_BLOCK_REGEX.replace_all(raw, "").into_owned();
    for variant in LINE_BREAK_VARIANTS {
        output = output.replace(variant, " ");
    }
    output
}

/// Number of override blocks in `raw`
pub fn override_block_count(raw: &str) -> usize {
    OVERRIDE_BLOCK_REGEX.find_iter(raw).count()
}
