//! Filter and sort engine
//!
//! Derives the displayed listing from committed catalog state. Never fetches;
//! search and sort changes re-run this against the same records.

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use std::cmp::Ordering;

use super::record::AppRecord;
use super::selection::SortMode;
use crate::state::CatalogState;

/// Outcome of a derivation
///
/// An empty listing is its own variant so callers show the "no apps" view
/// rather than treating it as a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Derived<'a> {
    Empty,
    Apps(Vec<&'a AppRecord>),
}

impl<'a> Derived<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Derived::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            Derived::Empty => 0,
            Derived::Apps(apps) => apps.len(),
        }
    }

    pub fn apps(&self) -> &[&'a AppRecord] {
        match self {
            Derived::Empty => &[],
            Derived::Apps(apps) => apps,
        }
    }

    pub fn into_vec(self) -> Vec<&'a AppRecord> {
        match self {
            Derived::Empty => Vec::new(),
            Derived::Apps(apps) => apps,
        }
    }
}

/// Derive the listing for the current state and a free-text query
pub fn derive<'a>(state: &'a CatalogState, query: &str) -> Derived<'a> {
    derive_records(&state.current_apps, state.current_sort, query)
}

/// Filter `apps` by `query`, then sort by `sort`
pub fn derive_records<'a>(apps: &'a [AppRecord], sort: SortMode, query: &str) -> Derived<'a> {
    let needle = normalize_query(query);

    let mut filtered: Vec<&AppRecord> = apps
        .iter()
        .filter(|app| matches_query(app, &needle))
        .collect();

    sort_records(&mut filtered, sort);

    if filtered.is_empty() {
        Derived::Empty
    } else {
        Derived::Apps(filtered)
    }
}

/// Trim and lowercase a user query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether a record passes a normalized query
///
/// Matches name, developer, bundle identifier and localized description.
/// The empty query matches everything.
pub fn matches_query(app: &AppRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let contains = |field: Option<&str>| {
        field
            .map(|value| value.to_lowercase().contains(needle))
            .unwrap_or(false)
    };

    contains(Some(&app.name))
        || contains(app.developer_name.as_deref())
        || contains(app.bundle_identifier.as_deref())
        || contains(app.localized_description.as_deref())
}

/// Stable sort by the given mode
pub fn sort_records(apps: &mut [&AppRecord], sort: SortMode) {
    match sort {
        SortMode::Date => apps.sort_by_key(|app| std::cmp::Reverse(app.date_sort_key())),
        SortMode::Name => apps.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortMode::Size => apps.sort_by_key(|app| std::cmp::Reverse(app.size)),
    }
}

thread_local! {
    static ROOT_COLLATOR: Option<CollatorBorrowed<'static>> =
        Collator::try_new(Default::default(), CollatorOptions::default()).ok();
}

/// Locale-style string ordering under root collation
///
/// Accents and case are secondary and tertiary differences, so `Ümlaut`
/// sorts with the u's and `apple` comes just before `Apple`. Collation ties
/// fall back to code point order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    ROOT_COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => case_folded_cmp(a, b),
        })
        .then_with(|| a.cmp(b))
}

fn case_folded_cmp(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);

    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}
