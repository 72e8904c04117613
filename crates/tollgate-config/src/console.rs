//! Structural checks for console content blocks (API cards, announcements, FAQ, status groups).

use chrono::DateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const MAX_API_INFO: usize = 50;
const MAX_ANNOUNCEMENTS: usize = 100;
const MAX_FAQ: usize = 100;
const MAX_UPTIME_GROUPS: usize = 20;

const API_INFO_COLORS: &[&str] = &[
    "blue",
    "green",
    "cyan",
    "purple",
    "pink",
    "red",
    "orange",
    "amber",
    "yellow",
    "lime",
    "light-green",
    "teal",
    "light-blue",
    "indigo",
    "violet",
    "grey",
];

const ANNOUNCEMENT_TYPES: &[&str] = &["default", "ongoing", "success", "warning", "error"];

#[derive(Debug, Deserialize)]
struct ApiInfoEntry {
    #[serde(default)]
    url: String,
    #[serde(default)]
    route: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Announcement {
    #[serde(default)]
    content: String,
    #[serde(default)]
    publish_date: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    extra: String,
}

#[derive(Debug, Deserialize)]
struct FaqEntry {
    #[serde(default)]
    question: String,
    #[serde(default)]
    answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UptimeKumaGroup {
    #[serde(default)]
    category_name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    description: String,
}

/// Validate the API information card list.
///
/// # Errors
///
/// Describes the first malformed entry.
pub fn check_api_info(raw: &str) -> Result<(), String> {
    let entries: Vec<ApiInfoEntry> = parse_list(raw, "API info", MAX_API_INFO)?;
    for (index, entry) in entries.iter().enumerate() {
        let at = index + 1;
        require_http_url(&entry.url, "API info", at)?;
        require_present(&entry.route, "API info", at, "route")?;
        limit_chars(&entry.description, 200, "API info", at, "description")?;
        if !API_INFO_COLORS.contains(&entry.color.as_str()) {
            return Err(format!("API info entry {at}: unsupported color `{}`", entry.color));
        }
    }
    Ok(())
}

/// Validate the announcement list.
///
/// # Errors
///
/// Describes the first malformed entry.
pub fn check_announcements(raw: &str) -> Result<(), String> {
    let entries: Vec<Announcement> = parse_list(raw, "announcements", MAX_ANNOUNCEMENTS)?;
    for (index, entry) in entries.iter().enumerate() {
        let at = index + 1;
        require_present(&entry.content, "announcement", at, "content")?;
        limit_chars(&entry.content, 500, "announcement", at, "content")?;
        require_present(&entry.publish_date, "announcement", at, "publishDate")?;
        if DateTime::parse_from_rfc3339(&entry.publish_date).is_err() {
            return Err(format!(
                "announcement entry {at}: publishDate must be an RFC 3339 timestamp"
            ));
        }
        if !entry.kind.is_empty() && !ANNOUNCEMENT_TYPES.contains(&entry.kind.as_str()) {
            return Err(format!(
                "announcement entry {at}: unsupported type `{}`",
                entry.kind
            ));
        }
        limit_chars(&entry.extra, 200, "announcement", at, "extra")?;
    }
    Ok(())
}

/// Validate the FAQ list.
///
/// # Errors
///
/// Describes the first malformed entry.
pub fn check_faq(raw: &str) -> Result<(), String> {
    let entries: Vec<FaqEntry> = parse_list(raw, "FAQ", MAX_FAQ)?;
    for (index, entry) in entries.iter().enumerate() {
        let at = index + 1;
        require_present(&entry.question, "FAQ", at, "question")?;
        limit_chars(&entry.question, 200, "FAQ", at, "question")?;
        require_present(&entry.answer, "FAQ", at, "answer")?;
        limit_chars(&entry.answer, 1000, "FAQ", at, "answer")?;
    }
    Ok(())
}

/// Validate the Uptime Kuma status group list.
///
/// # Errors
///
/// Describes the first malformed entry.
pub fn check_uptime_kuma_groups(raw: &str) -> Result<(), String> {
    let groups: Vec<UptimeKumaGroup> = parse_list(raw, "uptime groups", MAX_UPTIME_GROUPS)?;
    for (index, group) in groups.iter().enumerate() {
        let at = index + 1;
        require_present(&group.category_name, "uptime group", at, "categoryName")?;
        require_http_url(&group.url, "uptime group", at)?;
        let slug_ok = !group.slug.is_empty()
            && group
                .slug
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !slug_ok {
            return Err(format!(
                "uptime group entry {at}: slug may only contain letters, digits, '_' and '-'"
            ));
        }
        limit_chars(&group.description, 200, "uptime group", at, "description")?;
    }
    Ok(())
}

fn parse_list<T: DeserializeOwned>(raw: &str, block: &str, max: usize) -> Result<Vec<T>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<T> =
        serde_json::from_str(raw).map_err(|err| format!("invalid {block} JSON: {err}"))?;
    if entries.len() > max {
        return Err(format!("{block} allows at most {max} entries"));
    }
    Ok(entries)
}

fn require_present(value: &str, block: &str, at: usize, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{block} entry {at}: {field} is required"));
    }
    Ok(())
}

fn limit_chars(value: &str, max: usize, block: &str, at: usize, field: &str) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!(
            "{block} entry {at}: {field} must be at most {max} characters"
        ));
    }
    Ok(())
}

fn require_http_url(value: &str, block: &str, at: usize) -> Result<(), String> {
    let valid = Url::parse(value)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
    if !valid {
        return Err(format!("{block} entry {at}: url must be an http(s) address"));
    }
    Ok(())
}
