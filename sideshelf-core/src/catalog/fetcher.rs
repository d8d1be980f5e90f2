//! Manifest fetching
//!
//! Turns a [`CatalogSelection`] into an ordered list of app records. Concrete
//! selections are a single request; `All` fans out to both sources at once
//! and merges whatever came back.

use std::sync::Arc;
use tracing::{debug, warn};

use super::location::SourceLocation;
use super::manifest::{merge_dedup, SourceManifest};
use super::record::AppRecord;
use super::selection::CatalogSelection;
use super::transport::ManifestTransport;
use crate::error::FetchError;

/// Result of a catalog load, including which halves of a merge were lost
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    /// Records in display-independent order, deduplicated for merges
    pub apps: Vec<AppRecord>,
    /// Sources that failed during an `All` load; always empty otherwise
    pub missing: Vec<CatalogSelection>,
}

impl CatalogLoad {
    /// True when an `All` load succeeded with only one source
    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Fetches and normalizes source manifests
///
/// Does not touch catalog state; the caller commits the result.
pub struct ManifestFetcher {
    transport: Arc<dyn ManifestTransport>,
    location: SourceLocation,
}

impl ManifestFetcher {
    pub fn new(transport: Arc<dyn ManifestTransport>, location: SourceLocation) -> Self {
        Self {
            transport,
            location,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Load the records for a selection
    pub async fn load_catalog(
        &self,
        selection: CatalogSelection,
    ) -> Result<Vec<AppRecord>, FetchError> {
        self.load_catalog_detailed(selection)
            .await
            .map(|load| load.apps)
    }

    /// Load the records for a selection, reporting partial merges
    pub async fn load_catalog_detailed(
        &self,
        selection: CatalogSelection,
    ) -> Result<CatalogLoad, FetchError> {
        match selection {
            CatalogSelection::Standard | CatalogSelection::Nsfw => {
                let manifest = self.fetch_manifest(selection).await?;
                debug!(
                    "Fetched '{}' via {}: {} apps",
                    selection,
                    self.transport.name(),
                    manifest.app_count()
                );
                Ok(CatalogLoad {
                    apps: manifest.apps,
                    missing: Vec::new(),
                })
            }
            CatalogSelection::All => self.fetch_merged().await,
        }
    }

    /// Fetch and parse the manifest of a concrete selection
    async fn fetch_manifest(
        &self,
        selection: CatalogSelection,
    ) -> Result<SourceManifest, FetchError> {
        let url = self.location.manifest_url(selection).ok_or_else(|| {
            FetchError::network(selection.key(), "selection has no manifest of its own")
        })?;

        let body = self.transport.get(&url).await?;
        SourceManifest::from_json(&url, &body)
    }

    /// Fetch both sources concurrently and merge the ones that succeeded
    ///
    /// Both requests always run to completion; one failure never cancels the
    /// other. Only when both fail is the load an error.
    async fn fetch_merged(&self) -> Result<CatalogLoad, FetchError> {
        let (standard, nsfw) = tokio::join!(
            self.fetch_manifest(CatalogSelection::Standard),
            self.fetch_manifest(CatalogSelection::Nsfw)
        );

        let (standard, nsfw) = match (standard, nsfw) {
            (Err(standard), Err(nsfw)) => {
                return Err(FetchError::AllSourcesFailed {
                    standard: Box::new(standard),
                    nsfw: Box::new(nsfw),
                });
            }
            pair => pair,
        };

        let mut lists = Vec::with_capacity(2);
        let mut missing = Vec::new();

        for (selection, result) in [
            (CatalogSelection::Standard, standard),
            (CatalogSelection::Nsfw, nsfw),
        ] {
            match result {
                Ok(manifest) => {
                    debug!(
                        "Fetched '{}' for merge: {} apps",
                        selection,
                        manifest.app_count()
                    );
                    lists.push(manifest.apps);
                }
                Err(e) => {
                    warn!("Failed to fetch '{}', continuing without it: {}", selection, e);
                    missing.push(selection);
                }
            }
        }

        let apps = merge_dedup(lists);
        debug!("Merged catalog: {} unique apps", apps.len());

        Ok(CatalogLoad { apps, missing })
    }
}
