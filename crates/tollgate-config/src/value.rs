//! Closed set of option value shapes accepted at the write boundary.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Raw option value as submitted by an administrator.
///
/// JSON bodies decode into one of these variants; any other JSON shape is
/// refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free-form text, stored verbatim.
    Text(String),
}

impl OptionValue {
    /// Canonical textual form used for storage and comparison.
    ///
    /// Numbers never use scientific notation.
    #[must_use]
    pub fn normalize(&self) -> String {
        match self {
            Self::Bool(flag) => flag.to_string(),
            Self::Integer(number) => number.to_string(),
            Self::Float(number) => format_float(*number),
            Self::Text(text) => text.clone(),
        }
    }
}

fn format_float(number: f64) -> String {
    if number.is_finite() {
        // `Display` for f64 is the shortest round-tripping decimal without an exponent.
        format!("{number}")
    } else if number.is_nan() {
        "NaN".to_string()
    } else if number.is_sign_positive() {
        "+Inf".to_string()
    } else {
        "-Inf".to_string()
    }
}

impl Display for OptionValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.normalize())
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_normalize_to_literals() {
        assert_eq!(OptionValue::Bool(true).normalize(), "true");
        assert_eq!(OptionValue::Bool(false).normalize(), "false");
    }

    #[test]
    fn numbers_avoid_exponent_and_padding() {
        assert_eq!(OptionValue::Integer(42).normalize(), "42");
        assert_eq!(OptionValue::Integer(-7).normalize(), "-7");
        assert_eq!(OptionValue::Float(1.0).normalize(), "1");
        assert_eq!(OptionValue::Float(0.25).normalize(), "0.25");
        assert_eq!(OptionValue::Float(1e21).normalize(), "1000000000000000000000");
        assert_eq!(OptionValue::Float(1e-7).normalize(), "0.0000001");
    }

    #[test]
    fn text_is_kept_verbatim() {
        let raw = "{\"default\":1.0}";
        assert_eq!(OptionValue::from(raw).normalize(), raw);
    }

    #[test]
    fn json_shapes_decode_into_closed_variants() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::from_str::<OptionValue>("true")?,
            OptionValue::Bool(true)
        );
        assert_eq!(
            serde_json::from_str::<OptionValue>("42")?,
            OptionValue::Integer(42)
        );
        assert_eq!(
            serde_json::from_str::<OptionValue>("2.5")?,
            OptionValue::Float(2.5)
        );
        assert_eq!(
            serde_json::from_str::<OptionValue>("\"x\"")?,
            OptionValue::Text("x".into())
        );
        assert!(serde_json::from_str::<OptionValue>("null").is_err());
        assert!(serde_json::from_str::<OptionValue>("[1]").is_err());
        assert!(serde_json::from_str::<OptionValue>("{\"a\":1}").is_err());
        Ok(())
    }
}
