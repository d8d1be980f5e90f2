//! Sideshelf Catalog - source manifests and the records they carry
//!
//! # Overview
//!
//! A catalog is one of two published source manifests, or both merged:
//!
//! ```text
//! <base>/sources/standard/source.json ← standard apps
//! <base>/sources/nsfw/source.json     ← nsfw apps
//!        │
//!        ▼
//! ManifestFetcher ──► merge_dedup (all only) ──► Vec<AppRecord>
//!        │
//!        ▼
//! derive(state, query) ──► filtered + sorted view
//! ```

mod fetcher;
mod location;
mod manifest;
mod query;
mod record;
mod selection;
mod transport;

pub use fetcher::{CatalogLoad, ManifestFetcher};
pub use location::SourceLocation;
pub use manifest::{merge_dedup, SourceManifest};
pub use query::{
    derive, derive_records, locale_cmp, matches_query, normalize_query, sort_records, Derived,
};
pub use record::{AppRecord, DEFAULT_TINT};
pub use selection::{CatalogSelection, SelectionMeta, SortMode};
pub use transport::{cache_busted, HttpTransport, ManifestTransport};
