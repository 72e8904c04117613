//! Per-key validation rules consulted before an option write is committed.
//!
//! # Design
//! - Rules are registered once by exact key and looked up read-only afterwards.
//! - Keys without a rule are accepted unconditionally.
//! - Prerequisite rules read the *current* value of another option; they never
//!   see other values submitted alongside the candidate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::{console, keys, payload};

/// Read access to the current option values, used by prerequisite rules.
pub trait OptionLookup {
    /// Current value for `key`, if one is stored.
    fn lookup(&self, key: &str) -> Option<&str>;
}

impl OptionLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl OptionLookup for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Structural check applied to a candidate value.
pub type PayloadCheck = fn(&str) -> Result<(), String>;

/// Decides whether a prerequisite value counts as configured.
pub type PresenceCheck = fn(&str) -> bool;

/// A validation capability bound to one option key.
#[derive(Clone)]
pub enum OptionRule {
    /// Enabling the flag (`"true"`) requires another option to be configured.
    RequiresOption {
        /// Key whose current value must be configured.
        prerequisite: String,
        /// Reason reported when the prerequisite is missing.
        message: String,
        /// Decides whether the prerequisite's value counts as configured.
        present: PresenceCheck,
    },
    /// The value is a serialized structure that must parse and pass checks.
    Payload(PayloadCheck),
}

impl fmt::Debug for OptionRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiresOption { prerequisite, .. } => formatter
                .debug_struct("RequiresOption")
                .field("prerequisite", prerequisite)
                .finish_non_exhaustive(),
            Self::Payload(_) => formatter.write_str("Payload"),
        }
    }
}

impl OptionRule {
    /// Prerequisite rule satisfied by any non-empty current value.
    #[must_use]
    pub fn requires(prerequisite: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequiresOption {
            prerequisite: prerequisite.into(),
            message: message.into(),
            present: is_non_empty,
        }
    }

    fn check(&self, candidate: &str, current: &dyn OptionLookup) -> Result<(), String> {
        match self {
            Self::RequiresOption {
                prerequisite,
                message,
                present,
            } => {
                if candidate != "true" {
                    return Ok(());
                }
                let configured = current.lookup(prerequisite).is_some_and(*present);
                if configured {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Self::Payload(check) => check(candidate),
        }
    }
}

/// Immutable mapping from option key to its validation rule.
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    rules: HashMap<String, OptionRule>,
}

impl ValidatorRegistry {
    /// Registry with no rules; every write is accepted.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry carrying the built-in rules for the gateway's options.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::default();
        for (flag, prerequisite, message) in PREREQUISITES {
            registry = registry.with_rule(*flag, OptionRule::requires(*prerequisite, *message));
        }
        registry
            .with_rule(keys::GROUP_RATIO, OptionRule::Payload(payload::check_group_ratio))
            .with_rule(keys::IMAGE_RATIO, OptionRule::Payload(payload::check_image_ratio))
            .with_rule(keys::AUDIO_RATIO, OptionRule::Payload(payload::check_audio_ratio))
            .with_rule(
                keys::AUDIO_COMPLETION_RATIO,
                OptionRule::Payload(payload::check_audio_completion_ratio),
            )
            .with_rule(
                keys::MODEL_REQUEST_RATE_LIMIT_GROUP,
                OptionRule::Payload(payload::check_rate_limit_groups),
            )
            .with_rule(
                keys::AUTOMATIC_DISABLE_STATUS_CODES,
                OptionRule::Payload(payload::check_status_code_rules),
            )
            .with_rule(keys::CONSOLE_API_INFO, OptionRule::Payload(console::check_api_info))
            .with_rule(
                keys::CONSOLE_ANNOUNCEMENTS,
                OptionRule::Payload(console::check_announcements),
            )
            .with_rule(keys::CONSOLE_FAQ, OptionRule::Payload(console::check_faq))
            .with_rule(
                keys::CONSOLE_UPTIME_KUMA_GROUPS,
                OptionRule::Payload(console::check_uptime_kuma_groups),
            )
    }

    /// Register (or replace) the rule for `key`.
    #[must_use]
    pub fn with_rule(mut self, key: impl Into<String>, rule: OptionRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Rule registered for `key`, if any.
    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&OptionRule> {
        self.rules.get(key)
    }

    /// Check `candidate` for `key` against current option values.
    ///
    /// # Errors
    ///
    /// Returns the human-readable rejection reason.
    pub fn validate(
        &self,
        key: &str,
        candidate: &str,
        current: &dyn OptionLookup,
    ) -> Result<(), String> {
        self.rules
            .get(key)
            .map_or(Ok(()), |rule| rule.check(candidate, current))
    }
}

const PREREQUISITES: &[(&str, &str, &str)] = &[
    (
        keys::GITHUB_OAUTH_ENABLED,
        keys::GITHUB_CLIENT_ID,
        "cannot enable GitHub OAuth: fill in the GitHub Client Id and GitHub Client Secret first",
    ),
    (
        keys::DISCORD_ENABLED,
        keys::DISCORD_CLIENT_ID,
        "cannot enable Discord OAuth: fill in the Discord Client Id and Discord Client Secret first",
    ),
    (
        keys::OIDC_ENABLED,
        keys::OIDC_CLIENT_ID,
        "cannot enable OIDC login: fill in the OIDC Client Id and OIDC Client Secret first",
    ),
    (
        keys::LINUXDO_OAUTH_ENABLED,
        keys::LINUXDO_CLIENT_ID,
        "cannot enable LinuxDO OAuth: fill in the LinuxDO Client Id and LinuxDO Client Secret first",
    ),
    (
        keys::EMAIL_DOMAIN_RESTRICTION_ENABLED,
        keys::EMAIL_DOMAIN_WHITELIST,
        "cannot enable email domain restriction: fill in the allowed email domains first",
    ),
    (
        keys::WECHAT_AUTH_ENABLED,
        keys::WECHAT_SERVER_ADDRESS,
        "cannot enable WeChat login: fill in the WeChat login server settings first",
    ),
    (
        keys::TURNSTILE_CHECK_ENABLED,
        keys::TURNSTILE_SITE_KEY,
        "cannot enable Turnstile checks: fill in the Turnstile settings first",
    ),
    (
        keys::TELEGRAM_OAUTH_ENABLED,
        keys::TELEGRAM_BOT_TOKEN,
        "cannot enable Telegram OAuth: fill in the Telegram Bot Token first",
    ),
];

const fn is_non_empty(value: &str) -> bool {
    !value.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn unregistered_keys_are_always_accepted() {
        let registry = ValidatorRegistry::standard();
        let state = current(&[]);
        assert!(registry.validate("Notice", "{not json", &state).is_ok());
        assert!(registry.validate("groupratio", "{not json", &state).is_ok());
    }

    #[test]
    fn prerequisite_flags_check_current_value_only_when_enabling() {
        let registry = ValidatorRegistry::standard();
        let missing = current(&[(keys::GITHUB_CLIENT_ID, "")]);
        let err = registry
            .validate(keys::GITHUB_OAUTH_ENABLED, "true", &missing)
            .unwrap_err();
        assert!(err.contains("GitHub OAuth"));
        assert!(registry.validate(keys::GITHUB_OAUTH_ENABLED, "false", &missing).is_ok());
        assert!(registry.validate(keys::GITHUB_OAUTH_ENABLED, "TRUE", &missing).is_ok());

        let configured = current(&[(keys::GITHUB_CLIENT_ID, "abc123")]);
        assert!(registry.validate(keys::GITHUB_OAUTH_ENABLED, "true", &configured).is_ok());
    }

    #[test]
    fn every_prerequisite_flag_is_registered() {
        let registry = ValidatorRegistry::standard();
        let state = current(&[]);
        for flag in [
            keys::GITHUB_OAUTH_ENABLED,
            keys::DISCORD_ENABLED,
            keys::OIDC_ENABLED,
            keys::LINUXDO_OAUTH_ENABLED,
            keys::EMAIL_DOMAIN_RESTRICTION_ENABLED,
            keys::WECHAT_AUTH_ENABLED,
            keys::TURNSTILE_CHECK_ENABLED,
            keys::TELEGRAM_OAUTH_ENABLED,
        ] {
            assert!(
                registry.validate(flag, "true", &state).is_err(),
                "{flag} should require its prerequisite"
            );
            assert!(registry.validate(flag, "false", &state).is_ok());
        }
    }

    #[test]
    fn only_an_empty_prerequisite_blocks_enabling() {
        let registry = ValidatorRegistry::standard();
        for (value, accepted) in [("", false), ("  ", true), (" , ,", true), ("example.com", true)] {
            let state = current(&[(keys::EMAIL_DOMAIN_WHITELIST, value)]);
            assert_eq!(
                registry
                    .validate(keys::EMAIL_DOMAIN_RESTRICTION_ENABLED, "true", &state)
                    .is_ok(),
                accepted,
                "whitelist {value:?}"
            );
        }

        let spaces = current(&[(keys::GITHUB_CLIENT_ID, "  ")]);
        assert!(registry.validate(keys::GITHUB_OAUTH_ENABLED, "true", &spaces).is_ok());
    }

    #[test]
    fn payload_rules_surface_check_errors() {
        let registry = ValidatorRegistry::standard();
        let state = current(&[]);
        assert!(registry.validate(keys::GROUP_RATIO, "{invalid", &state).is_err());
        assert!(
            registry
                .validate(keys::GROUP_RATIO, "{\"default\":1.0}", &state)
                .is_ok()
        );
        assert!(
            registry
                .validate(keys::AUTOMATIC_DISABLE_STATUS_CODES, "700", &state)
                .is_err()
        );
        assert!(registry.validate(keys::CONSOLE_FAQ, "[]", &state).is_ok());
    }

    #[test]
    fn custom_rules_extend_the_registry() {
        let registry = ValidatorRegistry::empty()
            .with_rule("Webhook.enabled", OptionRule::requires("Webhook.url", "set a webhook url"));
        assert!(registry.rule("Webhook.enabled").is_some());
        let err = registry
            .validate("Webhook.enabled", "true", &current(&[]))
            .unwrap_err();
        assert_eq!(err, "set a webhook url");
    }
}
