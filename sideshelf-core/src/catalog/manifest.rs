//! Source manifest parsing and merging
//!
//! A manifest is the `source.json` document published for one catalog:
//! `{ "apps": [ ... ] }`. Only `apps` is read; anything else is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::record::{null_as_default, AppRecord};
use crate::error::FetchError;

/// A parsed `source.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceManifest {
    /// App entries in published order; missing or null means empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub apps: Vec<AppRecord>,
}

impl SourceManifest {
    /// Parse a manifest body fetched from `url`
    pub fn from_json(url: &str, body: &str) -> Result<Self, FetchError> {
        serde_json::from_str(body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub fn app_count(&self) -> usize {
        self.apps.len()
    }
}

/// Concatenate app lists in order and drop later duplicates
///
/// Records are keyed by [`AppRecord::dedup_key`]; the first occurrence wins,
/// so callers pass lists in priority order (standard before nsfw).
pub fn merge_dedup<I>(lists: I) -> Vec<AppRecord>
where
    I: IntoIterator<Item = Vec<AppRecord>>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for app in lists.into_iter().flatten() {
        if seen.insert(app.dedup_key().to_string()) {
            merged.push(app);
        } else {
            tracing::trace!(key = app.dedup_key(), "Dropping duplicate app record");
        }
    }

    merged
}
