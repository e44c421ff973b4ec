use anyhow::{Result, anyhow};
use isolang::Language;

// @module: LanguageTool locale handling
// Locales look like `en-US`, `de-DE` or plain `fr`, plus the special value `auto`.

/// Validate a LanguageTool locale such as `en-US`
///
/// The primary subtag must be an ISO 639-1 or ISO 639-3 code; region and
/// variant subtags must be alphanumeric.
pub fn validate_locale(locale: &str) -> Result<()> {
    let locale = locale.trim();
    if locale.eq_ignore_ascii_case("auto") {
        return Ok(());
    }

    let mut subtags = locale.split('-');
    let primary = subtags.next().unwrap_or_default().to_lowercase();
    let known = match primary.len() {
        2 => Language::from_639_1(&primary).is_some(),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };
    if !known {
        return Err(anyhow!("Invalid language code: {}", locale));
    }

    if subtags.any(|tag| tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric())) {
        return Err(anyhow!("Invalid locale subtag in: {}", locale));
    }

    Ok(())
}

/// English name of the locale's language, e.g. "English" for `en-US`
pub fn get_language_name(locale: &str) -> Result<String> {
    let primary = locale.split('-').next().unwrap_or_default().to_lowercase();
    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", locale))
}

/// Identifier of LanguageTool's Morfologik spelling rule for a locale
///
/// `en-US` maps to `MORFOLOGIK_RULE_EN_US`. Languages with a differently
/// named speller need `ignore.spelling_rule_id` in the config file.
pub fn spelling_rule_id(locale: &str) -> String {
    format!("MORFOLOGIK_RULE_{}", locale.trim().replace('-', "_").to_uppercase())
}
