//! Built-in option values seeded before persisted rows are overlaid.
//!
//! # Design
//! - Every key with a registered rule gets a default that passes that rule.
//! - Persisted rows always win over these values.

use std::collections::HashMap;

use crate::keys;

const DEFAULT_OPTIONS: &[(&str, &str)] = &[
    (keys::GITHUB_OAUTH_ENABLED, "false"),
    (keys::GITHUB_CLIENT_ID, ""),
    (keys::GITHUB_CLIENT_SECRET, ""),
    (keys::DISCORD_ENABLED, "false"),
    (keys::DISCORD_CLIENT_ID, ""),
    (keys::DISCORD_CLIENT_SECRET, ""),
    (keys::OIDC_ENABLED, "false"),
    (keys::OIDC_CLIENT_ID, ""),
    (keys::OIDC_CLIENT_SECRET, ""),
    (keys::LINUXDO_OAUTH_ENABLED, "false"),
    (keys::LINUXDO_CLIENT_ID, ""),
    (keys::LINUXDO_CLIENT_SECRET, ""),
    (keys::EMAIL_DOMAIN_RESTRICTION_ENABLED, "false"),
    (keys::EMAIL_DOMAIN_WHITELIST, ""),
    (keys::WECHAT_AUTH_ENABLED, "false"),
    (keys::WECHAT_SERVER_ADDRESS, ""),
    (keys::WECHAT_SERVER_TOKEN, ""),
    (keys::TURNSTILE_CHECK_ENABLED, "false"),
    (keys::TURNSTILE_SITE_KEY, ""),
    (keys::TURNSTILE_SECRET_KEY, ""),
    (keys::TELEGRAM_OAUTH_ENABLED, "false"),
    (keys::TELEGRAM_BOT_TOKEN, ""),
    (keys::TELEGRAM_BOT_NAME, ""),
    (keys::GROUP_RATIO, r#"{"default":1,"vip":1,"svip":1}"#),
    (keys::IMAGE_RATIO, "{}"),
    (keys::AUDIO_RATIO, "{}"),
    (keys::AUDIO_COMPLETION_RATIO, "{}"),
    (keys::MODEL_REQUEST_RATE_LIMIT_GROUP, "{}"),
    (keys::AUTOMATIC_DISABLE_STATUS_CODES, "401"),
    (keys::CONSOLE_API_INFO, "[]"),
    (keys::CONSOLE_ANNOUNCEMENTS, "[]"),
    (keys::CONSOLE_FAQ, "[]"),
    (keys::CONSOLE_UPTIME_KUMA_GROUPS, "[]"),
];

/// Fresh map of the built-in defaults.
#[must_use]
pub fn default_options() -> HashMap<String, String> {
    DEFAULT_OPTIONS
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}
