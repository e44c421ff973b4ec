use crate::checker::classifier::DialogueClassifier;
use crate::grammar::Match;
use crate::subtitle_processor::SubtitleEvent;

// @module: Cross-line false positive removal

/// Rule flagging a sentence that starts in lower case
pub const UPPERCASE_SENTENCE_START: &str = "UPPERCASE_SENTENCE_START";

/// Nearest dialogue event before `index`, skipping signs and comments
pub fn previous_dialogue_event<'a>(
    events: &'a [SubtitleEvent],
    index: usize,
    classifier: &DialogueClassifier,
) -> Option<&'a SubtitleEvent> {
    let end = index.min(events.len());
    events[..end].iter().rev().find(|event| classifier.is_dialogue(event))
}

/// Whether a line following `previous_text` is still the same sentence
///
/// True when the text does not end in `.`, `?` or `!`, or trails off with `...`.
pub fn continues_previous_line(previous_text: &str) -> bool {
    match previous_text.chars().last() {
        Some(last) => !matches!(last, '.' | '?' | '!') || previous_text.ends_with("..."),
        None => false,
    }
}

/// Remove uppercase-start matches from an event that continues the previous dialogue line
pub fn adjudicate(
    matches: Vec<Match>,
    index: usize,
    events: &[SubtitleEvent],
    classifier: &DialogueClassifier,
) -> Vec<Match> {
    let Some(previous) = previous_dialogue_event(events, index, classifier) else {
        return matches;
    };

    if !continues_previous_line(&previous.text) {
        return matches;
    }

    matches
        .into_iter()
        .filter(|m| m.rule_id != UPPERCASE_SENTENCE_START)
        .collect()
}
