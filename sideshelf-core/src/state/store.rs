use serde::Serialize;
use tracing::trace;

use crate::catalog::{AppRecord, CatalogSelection, SortMode};
use crate::i18n::Language;

/// Current catalog state
///
/// Read freely through [`CatalogStore::snapshot`]; written only through
/// [`CatalogStore::set`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogState {
    /// Records of the last successful load, replaced wholesale
    pub current_apps: Vec<AppRecord>,
    /// Selection the user asked for, committed before its data arrives
    pub current_source: CatalogSelection,
    pub current_sort: SortMode,
    pub current_lang: Language,
}

impl CatalogState {
    /// Committed record named by bundle identifier or app name
    pub fn find(&self, identifier: &str) -> Option<&AppRecord> {
        self.current_apps
            .iter()
            .find(|app| app.is_identified_by(identifier))
    }
}

/// One write to the catalog state
#[derive(Debug, Clone)]
pub enum StateUpdate {
    Apps(Vec<AppRecord>),
    Source(CatalogSelection),
    Sort(SortMode),
    Lang(Language),
}

impl StateUpdate {
    fn key(&self) -> &'static str {
        match self {
            StateUpdate::Apps(_) => "currentApps",
            StateUpdate::Source(_) => "currentSource",
            StateUpdate::Sort(_) => "currentSort",
            StateUpdate::Lang(_) => "currentLang",
        }
    }
}

/// Owner of the catalog state
///
/// Pure storage: no validation and no derived recomputation on write.
/// Last write wins.
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: CatalogState,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an initial selection, with empty apps and default sort
    pub fn with_source(source: CatalogSelection) -> Self {
        Self {
            state: CatalogState {
                current_source: source,
                ..Default::default()
            },
        }
    }

    pub fn snapshot(&self) -> &CatalogState {
        &self.state
    }

    pub fn set(&mut self, update: StateUpdate) {
        trace!(key = update.key(), "State write");

        match update {
            StateUpdate::Apps(apps) => self.state.current_apps = apps,
            StateUpdate::Source(source) => self.state.current_source = source,
            StateUpdate::Sort(sort) => self.state.current_sort = sort,
            StateUpdate::Lang(lang) => self.state.current_lang = lang,
        }
    }
}
