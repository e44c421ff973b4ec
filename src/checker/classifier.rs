use once_cell::sync::Lazy;

use crate::subtitle_processor::SubtitleEvent;

// @module: Dialogue detection for subtitle events

// @const: Style prefixes used by most fansub and release scripts
pub const DEFAULT_DIALOGUE_STYLES: [&str; 3] = ["Dialogue", "main", "Default"];

static DEFAULT_CLASSIFIER: Lazy<DialogueClassifier> = Lazy::new(DialogueClassifier::default);

/// Decides which events carry spoken dialogue
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueClassifier {
    // @field: Case-sensitive style name prefixes
    style_prefixes: Vec<String>,
}

impl Default for DialogueClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DIALOGUE_STYLES)
    }
}

impl DialogueClassifier {
    /// Create a classifier accepting styles that start with any of `style_prefixes`
    pub fn new<I, S>(style_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            style_prefixes: style_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted style prefixes
    pub fn style_prefixes(&self) -> &[String] {
        &self.style_prefixes
    }

    /// Non-empty, not commented out, and styled as dialogue
    pub fn is_dialogue(&self, event: &SubtitleEvent) -> bool {
        !event.text.is_empty()
            && !event.is_comment()
            && self
                .style_prefixes
                .iter()
                .any(|prefix| event.style.starts_with(prefix.as_str()))
    }
}

/// `DialogueClassifier::is_dialogue` with the default style prefixes
pub fn is_dialogue(event: &SubtitleEvent) -> bool {
    DEFAULT_CLASSIFIER.is_dialogue(event)
}
