// Display-name normalization for email derivation.
//
// Lowercase, strip everything that is not a word character or whitespace,
// split on whitespace runs. The assigner builds local-parts from the token
// list this produces.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::errors::RosterError;

fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]+").expect("valid strip pattern"))
}

fn whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize a raw display name into ordered lowercase tokens.
///
/// A name that strips to nothing (empty, whitespace-only, or punctuation
/// soup) fails with `InvalidName` — the caller decides whether that skips
/// or rejects the record.
pub fn normalize_name(raw: &str) -> Result<Vec<String>, RosterError> {
    let lowered = raw.to_lowercase();
    let stripped = strip_pattern().replace_all(&lowered, "");

    let tokens: Vec<String> = whitespace_pattern()
        .split(stripped.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.is_empty() {
        return Err(RosterError::InvalidName {
            raw: raw.to_string(),
        });
    }

    Ok(tokens)
}
