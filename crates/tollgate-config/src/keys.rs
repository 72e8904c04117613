//! Well-known option keys.

/// Enables GitHub OAuth sign-in.
pub const GITHUB_OAUTH_ENABLED: &str = "GitHubOAuthEnabled";
/// GitHub OAuth client identifier.
pub const GITHUB_CLIENT_ID: &str = "GitHubClientId";
/// GitHub OAuth client secret.
pub const GITHUB_CLIENT_SECRET: &str = "GitHubClientSecret";
/// Enables Discord OAuth sign-in.
pub const DISCORD_ENABLED: &str = "discord.enabled";
/// Discord OAuth client identifier.
pub const DISCORD_CLIENT_ID: &str = "discord.client_id";
/// Discord OAuth client secret.
pub const DISCORD_CLIENT_SECRET: &str = "discord.client_secret";
/// Enables OIDC sign-in.
pub const OIDC_ENABLED: &str = "oidc.enabled";
/// OIDC client identifier.
pub const OIDC_CLIENT_ID: &str = "oidc.client_id";
/// OIDC client secret.
pub const OIDC_CLIENT_SECRET: &str = "oidc.client_secret";
/// Enables LinuxDO OAuth sign-in.
pub const LINUXDO_OAUTH_ENABLED: &str = "LinuxDOOAuthEnabled";
/// LinuxDO OAuth client identifier.
pub const LINUXDO_CLIENT_ID: &str = "LinuxDOClientId";
/// LinuxDO OAuth client secret.
pub const LINUXDO_CLIENT_SECRET: &str = "LinuxDOClientSecret";
/// Restricts registration to whitelisted email domains.
pub const EMAIL_DOMAIN_RESTRICTION_ENABLED: &str = "EmailDomainRestrictionEnabled";
/// Comma-separated list of allowed email domains.
pub const EMAIL_DOMAIN_WHITELIST: &str = "EmailDomainWhitelist";
/// Enables WeChat sign-in.
pub const WECHAT_AUTH_ENABLED: &str = "WeChatAuthEnabled";
/// WeChat login bridge address.
pub const WECHAT_SERVER_ADDRESS: &str = "WeChatServerAddress";
/// WeChat login bridge token.
pub const WECHAT_SERVER_TOKEN: &str = "WeChatServerToken";
/// Enables Cloudflare Turnstile checks.
pub const TURNSTILE_CHECK_ENABLED: &str = "TurnstileCheckEnabled";
/// Turnstile site key.
pub const TURNSTILE_SITE_KEY: &str = "TurnstileSiteKey";
/// Turnstile secret key.
pub const TURNSTILE_SECRET_KEY: &str = "TurnstileSecretKey";
/// Enables Telegram sign-in.
pub const TELEGRAM_OAUTH_ENABLED: &str = "TelegramOAuthEnabled";
/// Telegram bot token.
pub const TELEGRAM_BOT_TOKEN: &str = "TelegramBotToken";
/// Telegram bot name.
pub const TELEGRAM_BOT_NAME: &str = "TelegramBotName";

/// Per-group billing multipliers.
pub const GROUP_RATIO: &str = "GroupRatio";
/// Per-model image billing multipliers.
pub const IMAGE_RATIO: &str = "ImageRatio";
/// Per-model audio input billing multipliers.
pub const AUDIO_RATIO: &str = "AudioRatio";
/// Per-model audio completion billing multipliers.
pub const AUDIO_COMPLETION_RATIO: &str = "AudioCompletionRatio";
/// Per-group `[total, success]` request limits.
pub const MODEL_REQUEST_RATE_LIMIT_GROUP: &str = "ModelRequestRateLimitGroup";
/// Upstream status codes that disable a channel automatically.
pub const AUTOMATIC_DISABLE_STATUS_CODES: &str = "AutomaticDisableStatusCodes";

/// Console API information cards.
pub const CONSOLE_API_INFO: &str = "console_setting.api_info";
/// Console announcements.
pub const CONSOLE_ANNOUNCEMENTS: &str = "console_setting.announcements";
/// Console FAQ entries.
pub const CONSOLE_FAQ: &str = "console_setting.faq";
/// Console Uptime Kuma status groups.
pub const CONSOLE_UPTIME_KUMA_GROUPS: &str = "console_setting.uptime_kuma_groups";
