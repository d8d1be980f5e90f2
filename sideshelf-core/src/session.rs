//! Catalog session - the selection/switch state machine
//!
//! Ties the fetcher, the state store and the fragment together:
//!
//! ```text
//! switch_to(target)
//!     │
//!     ├── target == current && apps loaded ──► Unchanged (no request)
//!     │
//!     ├── commit current_source = target
//!     ├── fetch target
//!     │      ├── ok  ──► commit current_apps, write #target ──► Loaded
//!     │      └── err ──► keep stale apps ──► Failed(affordance, retry = target)
//! ```

use tracing::{debug, info, warn};

use crate::catalog::{derive, CatalogSelection, Derived, ManifestFetcher, SortMode};
use crate::error::FetchError;
use crate::i18n::Language;
use crate::state::{CatalogState, CatalogStore, FragmentStore, StateUpdate};

/// What a failed load shows the user
#[derive(Debug)]
pub struct ErrorAffordance {
    pub title: &'static str,
    pub description: &'static str,
    pub retry_label: &'static str,
    /// Selection the retry action reloads
    pub retry_target: CatalogSelection,
    /// Underlying cause, for logs and verbose output
    pub error: FetchError,
}

impl ErrorAffordance {
    fn new(error: FetchError, target: CatalogSelection, lang: Language) -> Self {
        let messages = lang.messages();
        Self {
            title: messages.load_failed_title,
            description: messages.load_failed_desc,
            retry_label: messages.retry,
            retry_target: target,
            error,
        }
    }
}

/// Result of a selection change
#[derive(Debug)]
pub enum SwitchOutcome {
    /// Target was already active and populated; nothing was fetched
    Unchanged,
    /// New records were committed
    Loaded {
        selection: CatalogSelection,
        count: usize,
        /// Sources dropped from a partial `all` load
        missing: Vec<CatalogSelection>,
    },
    /// The load failed; the previous records are still in place
    Failed(ErrorAffordance),
}

impl SwitchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SwitchOutcome::Failed(_))
    }
}

/// Owns catalog state for the lifetime of the program
pub struct CatalogSession {
    store: CatalogStore,
    fetcher: ManifestFetcher,
    fragment: Box<dyn FragmentStore>,
}

impl CatalogSession {
    /// Create a session whose initial selection comes from the stored fragment
    pub fn new(fetcher: ManifestFetcher, fragment: Box<dyn FragmentStore>) -> Self {
        let initial = fragment.initial_selection();
        debug!("Initial selection: {}", initial);

        Self {
            store: CatalogStore::with_source(initial),
            fetcher,
            fragment,
        }
    }

    pub fn state(&self) -> &CatalogState {
        self.store.snapshot()
    }

    pub fn fetcher(&self) -> &ManifestFetcher {
        &self.fetcher
    }

    /// Initial load of whatever selection the session started on
    pub async fn start(&mut self) -> SwitchOutcome {
        let target = self.state().current_source;
        self.load(target).await
    }

    /// Switch to `target`, fetching unless it is already active and loaded
    pub async fn switch_to(&mut self, target: CatalogSelection) -> SwitchOutcome {
        let state = self.state();
        if state.current_source == target && !state.current_apps.is_empty() {
            debug!("'{}' already loaded, skipping fetch", target);
            return SwitchOutcome::Unchanged;
        }

        self.store.set(StateUpdate::Source(target));
        self.load(target).await
    }

    /// Advance `standard -> nsfw -> all -> standard`
    pub async fn toggle(&mut self) -> SwitchOutcome {
        let next = self.state().current_source.next();
        self.switch_to(next).await
    }

    /// Re-run the load an affordance was created for
    pub async fn retry(&mut self, affordance: &ErrorAffordance) -> SwitchOutcome {
        let target = affordance.retry_target;
        info!("Retrying '{}'", target);
        self.store.set(StateUpdate::Source(target));
        self.load(target).await
    }

    async fn load(&mut self, target: CatalogSelection) -> SwitchOutcome {
        match self.fetcher.load_catalog_detailed(target).await {
            Ok(load) => {
                let count = load.apps.len();
                self.store.set(StateUpdate::Apps(load.apps));

                if let Err(e) = self.fragment.write(&target.to_fragment()) {
                    warn!("Failed to persist selection: {:#}", e);
                }

                debug!("Loaded '{}': {} apps", target, count);
                SwitchOutcome::Loaded {
                    selection: target,
                    count,
                    missing: load.missing,
                }
            }
            Err(e) => {
                e.log();
                SwitchOutcome::Failed(ErrorAffordance::new(
                    e,
                    target,
                    self.state().current_lang,
                ))
            }
        }
    }

    /// Set the sort mode; returns whether it changed
    pub fn set_sort(&mut self, mode: SortMode) -> bool {
        if self.state().current_sort == mode {
            return false;
        }
        self.store.set(StateUpdate::Sort(mode));
        true
    }

    /// Advance `date -> name -> size -> date`
    pub fn cycle_sort(&mut self) -> SortMode {
        let next = self.state().current_sort.cycle();
        self.store.set(StateUpdate::Sort(next));
        next
    }

    pub fn set_language(&mut self, lang: Language) {
        self.store.set(StateUpdate::Lang(lang));
    }

    /// Listing for a search query against the committed records
    pub fn derive(&self, query: &str) -> Derived<'_> {
        derive(self.state(), query)
    }
}
