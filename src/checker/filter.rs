/*!
 * Ignore policies applied to grammar engine output.
 *
 * Every match is tested against the user's suppressions: rule identifiers,
 * categories, ignored words, the spelling switch and the informal-language
 * switch. Surviving matches keep their original order.
 */

use std::collections::HashSet;

use crate::grammar::Match;

/// Spelling rule of the default `en-US` locale
pub const DEFAULT_SPELLING_RULE_ID: &str = "MORFOLOGIK_RULE_EN_US";

/// Marker LanguageTool puts in messages about informal language
const INFORMAL_MARKER: &str = "informal";

/// User-configured suppressions, read-only once built
#[derive(Debug, Clone, PartialEq)]
pub struct IgnorePolicy {
    /// Upper-cased rule identifiers
    rules: HashSet<String>,
    /// Lower-cased issue types
    categories: HashSet<String>,
    /// Lower-cased words
    words: HashSet<String>,
    ignore_spelling: bool,
    ignore_informal: bool,
    spelling_rule_id: String,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self {
            rules: HashSet::new(),
            categories: HashSet::new(),
            words: HashSet::new(),
            ignore_spelling: false,
            ignore_informal: false,
            spelling_rule_id: DEFAULT_SPELLING_RULE_ID.to_string(),
        }
    }
}

impl IgnorePolicy {
    /// Build a policy; comparisons against all three lists are case-insensitive
    pub fn new<R, C, W>(
        rules: R,
        categories: C,
        words: W,
        ignore_spelling: bool,
        ignore_informal: bool,
        spelling_rule_id: impl Into<String>,
    ) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Self {
            rules: rules.into_iter().map(|r| r.as_ref().to_uppercase()).collect(),
            categories: categories.into_iter().map(|c| c.as_ref().to_lowercase()).collect(),
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
            ignore_spelling,
            ignore_informal,
            spelling_rule_id: spelling_rule_id.into(),
        }
    }

    /// Rule identifier that marks spelling matches
    pub fn spelling_rule_id(&self) -> &str {
        &self.spelling_rule_id
    }

    /// Whether `rule_id` is on the ignore list
    pub fn ignores_rule(&self, rule_id: &str) -> bool {
        self.rules.contains(&rule_id.to_uppercase())
    }

    /// Whether the match's issue type is an ignored category
    pub fn ignores_category(&self, m: &Match) -> bool {
        !m.issue_type.is_empty() && self.categories.contains(&m.issue_type.to_lowercase())
    }

    /// Whether `word` is on the ignore list
    pub fn ignores_word(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Whether the match is a spelling match for the configured locale
    pub fn is_spelling(&self, m: &Match) -> bool {
        m.rule_id == self.spelling_rule_id
    }

    /// Whether any suppression applies to `m`
    pub fn is_ignored(&self, m: &Match) -> bool {
        if self.ignores_rule(&m.rule_id) {
            return true;
        }
        if self.ignore_informal && m.message.contains(INFORMAL_MARKER) {
            return true;
        }
        if self.ignores_category(m) {
            return true;
        }
        self.is_spelling(m) && (self.ignore_spelling || self.ignores_word(&m.matched_text))
    }
}

/// Drop every match the policy ignores, keeping the order of the rest
pub fn filter_matches(matches: Vec<Match>, policy: &IgnorePolicy) -> Vec<Match> {
    matches.into_iter().filter(|m| !policy.is_ignored(m)).collect()
}
