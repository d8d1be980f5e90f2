//! Catalog selections and sort modes
//!
//! A selection names one of the published sources. `All` is virtual: it has
//! no manifest of its own and is served by merging the other two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which catalog is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSelection {
    #[default]
    Standard,
    Nsfw,
    All,
}

/// Static presentation metadata attached to a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionMeta {
    /// Manifest path relative to the source base, `None` for virtual selections
    pub path: Option<&'static str>,
    /// Message key for the selection label
    pub label_key: &'static str,
    /// Theme name
    pub theme: &'static str,
    /// Theme color as a hex string
    pub theme_color: &'static str,
    /// Icon identifier
    pub icon_id: &'static str,
}

impl CatalogSelection {
    /// Every selection, in toggle order
    pub const ALL: [CatalogSelection; 3] = [
        CatalogSelection::Standard,
        CatalogSelection::Nsfw,
        CatalogSelection::All,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CatalogSelection::Standard => "standard",
            CatalogSelection::Nsfw => "nsfw",
            CatalogSelection::All => "all",
        }
    }

    pub fn meta(self) -> SelectionMeta {
        match self {
            CatalogSelection::Standard => SelectionMeta {
                path: Some("sources/standard/source.json"),
                label_key: "sourceStandard",
                theme: "standard",
                theme_color: "#10b981",
                icon_id: "icon-standard",
            },
            CatalogSelection::Nsfw => SelectionMeta {
                path: Some("sources/nsfw/source.json"),
                label_key: "sourceNSFW",
                theme: "nsfw",
                theme_color: "#db2777",
                icon_id: "icon-nsfw",
            },
            CatalogSelection::All => SelectionMeta {
                path: None,
                label_key: "sourceAll",
                theme: "all",
                theme_color: "#2563eb",
                icon_id: "icon-all",
            },
        }
    }

    /// Next selection in the fixed cycle `standard -> nsfw -> all -> standard`
    pub fn next(self) -> Self {
        match self {
            CatalogSelection::Standard => CatalogSelection::Nsfw,
            CatalogSelection::Nsfw => CatalogSelection::All,
            CatalogSelection::All => CatalogSelection::Standard,
        }
    }

    /// Selection whose manifest is shared when this one is active.
    /// `All` has no manifest, so it shares the standard one.
    pub fn shareable(self) -> Self {
        match self {
            CatalogSelection::All => CatalogSelection::Standard,
            other => other,
        }
    }

    /// Render as a location fragment, e.g. `#nsfw`
    pub fn to_fragment(self) -> String {
        format!("#{}", self.key())
    }

    /// Parse a location fragment; the leading `#` is optional.
    /// Returns `None` for anything that is not a known selection.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        fragment.trim().trim_start_matches('#').parse().ok()
    }
}

impl fmt::Display for CatalogSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CatalogSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(CatalogSelection::Standard),
            "nsfw" => Ok(CatalogSelection::Nsfw),
            "all" => Ok(CatalogSelection::All),
            other => Err(format!(
                "Unknown source '{other}' (expected standard, nsfw or all)"
            )),
        }
    }
}

/// Ordering applied to the derived listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest `versionDate` first
    #[default]
    Date,
    /// Alphabetical by name
    Name,
    /// Largest package first
    Size,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Date, SortMode::Name, SortMode::Size];

    pub fn key(self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Name => "name",
            SortMode::Size => "size",
        }
    }

    /// Next mode in `date -> name -> size -> date`
    pub fn cycle(self) -> Self {
        match self {
            SortMode::Date => SortMode::Name,
            SortMode::Name => SortMode::Size,
            SortMode::Size => SortMode::Date,
        }
    }

    /// Message key for the sort label
    pub fn label_key(self) -> &'static str {
        match self {
            SortMode::Date => "sortLatest",
            SortMode::Name => "sortName",
            SortMode::Size => "sortSize",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortMode::Date),
            "name" => Ok(SortMode::Name),
            "size" => Ok(SortMode::Size),
            other => Err(format!("Unknown sort '{other}' (expected date, name or size)")),
        }
    }
}
