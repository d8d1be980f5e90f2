//! App records as published in a source manifest
//!
//! Manifests are produced by third parties and are only loosely shaped, so
//! every field except `name` is optional and scalar fields tolerate the wrong
//! JSON type instead of failing the whole catalog.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Tint used when a record has no usable `tintColor`
pub const DEFAULT_TINT: &str = "#3b82f6";

static TINT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#?([0-9a-f]{3}|[0-9a-f]{6})$").expect("tint pattern is valid")
});

/// One installable application entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    /// Display name, also the identity fallback
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,

    /// Bundle identifier, the stable identity within a catalog
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle_identifier: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub developer_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub localized_description: Option<String>,

    /// Older manifests use `description` instead of `localizedDescription`
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Changelog for the current version
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_description: Option<String>,

    #[serde(
        default, rename = "iconURL",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub icon_url: Option<String>,

    /// Hex tint, validated lazily by [`AppRecord::tint`]
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tint_color: Option<String>,

    /// Package size in bytes
    #[serde(default, deserialize_with = "lenient_size")]
    pub size: u64,

    /// ISO 8601 date of the current version
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_date: Option<String>,

    /// Direct package URL
    #[serde(
        default, rename = "downloadURL",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,

    #[serde(
        default, rename = "minOSVersion",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_os_version: Option<String>,
}

impl AppRecord {
    /// Identity used for deduplication: the bundle identifier when it is
    /// present and non-empty, otherwise the name
    pub fn dedup_key(&self) -> &str {
        self.bundle_identifier
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.name)
    }

    /// Whether `identifier` names this record (bundle identifier or name)
    pub fn is_identified_by(&self, identifier: &str) -> bool {
        self.bundle_identifier.as_deref() == Some(identifier) || self.name == identifier
    }

    /// Validated tint color, falling back to [`DEFAULT_TINT`]
    pub fn tint(&self) -> &str {
        self.tint_color
            .as_deref()
            .filter(|tint| TINT_PATTERN.is_match(tint))
            .unwrap_or(DEFAULT_TINT)
    }

    /// Long description, preferring `localizedDescription`
    pub fn long_description(&self) -> Option<&str> {
        non_empty(self.localized_description.as_deref())
            .or_else(|| non_empty(self.description.as_deref()))
    }

    /// Changelog text, if any
    pub fn changelog(&self) -> Option<&str> {
        non_empty(self.version_description.as_deref())
    }

    /// Parsed `versionDate`
    ///
    /// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` datetimes
    /// (read as UTC) and plain `YYYY-MM-DD` dates (midnight UTC).
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        self.version_date.as_deref().and_then(parse_version_date)
    }

    /// Sort key for `versionDate`; unparsable or missing dates sort as the
    /// earliest possible instant
    pub fn date_sort_key(&self) -> i64 {
        self.parsed_date()
            .map(|date| date.timestamp_millis())
            .unwrap_or(i64::MIN)
    }
}

pub(crate) fn parse_version_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strings that sometimes arrive as numbers or booleans (`"version": 2`,
/// `"minOSVersion": 14.0`); other shapes read as missing
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Sizes show up as integers, floats, strings or null in the wild
fn lenient_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    let size = match value {
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };

    Ok(size)
}
