//! Checks for options whose value is itself a serialized table or rule list.

use std::collections::{BTreeMap, HashMap};

const MAX_RATE_LIMIT: i64 = 2_147_483_647;
const STATUS_CODE_MIN: u16 = 100;
const STATUS_CODE_MAX: u16 = 599;

/// Validate a `GroupRatio` table: group name to a non-negative multiplier.
///
/// # Errors
///
/// Returns the parse error verbatim, or names the first negative group.
pub fn check_group_ratio(raw: &str) -> Result<(), String> {
    let table: BTreeMap<String, f64> = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    if let Some((name, _)) = table.iter().find(|(_, ratio)| **ratio < 0.0) {
        return Err(format!("group ratio for {name} must not be negative"));
    }
    Ok(())
}

/// Validate an `ImageRatio` table.
///
/// # Errors
///
/// Returns the parse error prefixed with the table name.
pub fn check_image_ratio(raw: &str) -> Result<(), String> {
    check_model_ratio_table(raw, "image ratio")
}

/// Validate an `AudioRatio` table.
///
/// # Errors
///
/// Returns the parse error prefixed with the table name.
pub fn check_audio_ratio(raw: &str) -> Result<(), String> {
    check_model_ratio_table(raw, "audio ratio")
}

/// Validate an `AudioCompletionRatio` table.
///
/// # Errors
///
/// Returns the parse error prefixed with the table name.
pub fn check_audio_completion_ratio(raw: &str) -> Result<(), String> {
    check_model_ratio_table(raw, "audio completion ratio")
}

fn check_model_ratio_table(raw: &str, table: &str) -> Result<(), String> {
    serde_json::from_str::<HashMap<String, f64>>(raw)
        .map(|_| ())
        .map_err(|err| format!("failed to update {table}: {err}"))
}

/// Validate a `ModelRequestRateLimitGroup` table: group to `[total, success]`.
///
/// # Errors
///
/// Returns the parse error verbatim, or describes the first out-of-range group.
pub fn check_rate_limit_groups(raw: &str) -> Result<(), String> {
    let groups: BTreeMap<String, [i64; 2]> =
        serde_json::from_str(raw).map_err(|err| err.to_string())?;
    for (group, [total, success]) in &groups {
        if *total < 0 || *success < 1 {
            return Err(format!(
                "group {group} has negative rate limit values: [{total}, {success}]"
            ));
        }
        if *total > MAX_RATE_LIMIT || *success > MAX_RATE_LIMIT {
            return Err(format!(
                "group {group} [{total}, {success}] exceeds max rate limit value {MAX_RATE_LIMIT}"
            ));
        }
    }
    Ok(())
}

/// Validate an `AutomaticDisableStatusCodes` rule list.
///
/// # Errors
///
/// Lists every malformed or out-of-range rule.
pub fn check_status_code_rules(raw: &str) -> Result<(), String> {
    StatusCodeRanges::parse(raw).map(|_| ())
}

/// Inclusive HTTP status code ranges, merged and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCodeRanges {
    ranges: Vec<(u16, u16)>,
}

impl StatusCodeRanges {
    /// Parse comma-separated codes and `start-end` ranges.
    ///
    /// ASCII and full-width commas both separate rules; blank rules are skipped.
    ///
    /// # Errors
    ///
    /// Returns a message listing every rule that could not be parsed.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let normalized = raw.replace('，', ",");
        let mut ranges = Vec::new();
        let mut invalid = Vec::new();

        for rule in normalized.split(',').map(str::trim).filter(|rule| !rule.is_empty()) {
            match parse_rule(rule) {
                Some(range) => ranges.push(range),
                None => invalid.push(rule),
            }
        }

        if !invalid.is_empty() {
            return Err(format!(
                "invalid HTTP status code rules: {}",
                invalid.join(", ")
            ));
        }
        Ok(Self {
            ranges: merge(ranges),
        })
    }

    /// Whether `code` falls inside any range.
    #[must_use]
    pub fn contains(&self, code: u16) -> bool {
        self.ranges
            .iter()
            .any(|(start, end)| (*start..=*end).contains(&code))
    }

    /// Merged ranges in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[(u16, u16)] {
        &self.ranges
    }
}

fn parse_rule(rule: &str) -> Option<(u16, u16)> {
    let (start, end) = match rule.split_once('-') {
        Some((start, end)) => (parse_code(start)?, parse_code(end)?),
        None => {
            let code = parse_code(rule)?;
            (code, code)
        }
    };
    (start <= end).then_some((start, end))
}

fn parse_code(text: &str) -> Option<u16> {
    let code: u16 = text.trim().parse().ok()?;
    (STATUS_CODE_MIN..=STATUS_CODE_MAX)
        .contains(&code)
        .then_some(code)
}

fn merge(mut ranges: Vec<(u16, u16)>) -> Vec<(u16, u16)> {
    ranges.sort_unstable();
    let mut merged: Vec<(u16, u16)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_ratio_surfaces_parse_error_verbatim() {
        let err = check_group_ratio("{invalid").unwrap_err();
        let expected = serde_json::from_str::<BTreeMap<String, f64>>("{invalid")
            .unwrap_err()
            .to_string();
        assert_eq!(err, expected);
        assert!(check_group_ratio("{\"default\":1.0}").is_ok());
        assert_eq!(
            check_group_ratio("{\"vip\":-0.5}").unwrap_err(),
            "group ratio for vip must not be negative"
        );
    }

    #[test]
    fn model_ratio_errors_name_the_table() {
        let err = check_audio_ratio("[1,2]").unwrap_err();
        assert!(err.starts_with("failed to update audio ratio: "));
        assert!(check_image_ratio("{\"dall-e-3\":2}").is_ok());
        assert!(check_audio_completion_ratio("{}").is_ok());
    }

    #[test]
    fn rate_limit_groups_enforce_bounds() {
        assert!(check_rate_limit_groups("{\"default\":[0,1],\"vip\":[100,50]}").is_ok());
        assert_eq!(
            check_rate_limit_groups("{\"default\":[-1,1]}").unwrap_err(),
            "group default has negative rate limit values: [-1, 1]"
        );
        assert_eq!(
            check_rate_limit_groups("{\"default\":[10,0]}").unwrap_err(),
            "group default has negative rate limit values: [10, 0]"
        );
        assert!(
            check_rate_limit_groups("{\"default\":[2147483648,1]}")
                .unwrap_err()
                .contains("exceeds max rate limit value 2147483647")
        );
        assert!(check_rate_limit_groups("{\"default\":[1]}").is_err());
    }

    #[test]
    fn status_codes_parse_and_merge() {
        let ranges = StatusCodeRanges::parse("401, 500-503，502-504,429").unwrap();
        assert_eq!(ranges.ranges(), &[(401, 401), (429, 429), (500, 504)]);
        assert!(ranges.contains(503));
        assert!(ranges.contains(401));
        assert!(!ranges.contains(404));
    }

    #[test]
    fn adjacent_status_ranges_collapse() {
        let ranges = StatusCodeRanges::parse("500-502,503").unwrap();
        assert_eq!(ranges.ranges(), &[(500, 503)]);
    }

    #[test]
    fn empty_status_rules_are_allowed() {
        assert!(StatusCodeRanges::parse("").unwrap().ranges().is_empty());
        assert!(check_status_code_rules(" , ").is_ok());
    }

    #[test]
    fn invalid_status_rules_are_listed() {
        let err = StatusCodeRanges::parse("401,99,600,503-500,abc").unwrap_err();
        assert_eq!(err, "invalid HTTP status code rules: 99, 600, 503-500, abc");
    }
}
