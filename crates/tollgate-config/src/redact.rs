//! Export-time filter that hides secret-bearing options.

use crate::store::OptionEntry;

/// Case-sensitive key suffixes that mark an option as secret.
pub const SENSITIVE_SUFFIXES: &[&str] = &["Token", "Secret", "Key", "secret", "api_key"];

/// Whether `key` names a secret that must not appear in bulk exports.
#[must_use]
pub fn is_sensitive(key: &str) -> bool {
    SENSITIVE_SUFFIXES
        .iter()
        .any(|suffix| key.ends_with(suffix))
}

/// Drop every entry whose key is sensitive.
#[must_use]
pub fn redact(entries: Vec<OptionEntry>) -> Vec<OptionEntry> {
    entries
        .into_iter()
        .filter(|entry| !is_sensitive(&entry.key))
        .collect()
}
