//! Where manifests live
//!
//! Manifests are published under a base URL. Development checkouts serve them
//! from a second base; a single `local_dev` flag picks which one is used.

use super::selection::CatalogSelection;

/// Resolves manifest paths to absolute URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    production_base: String,
    dev_base: String,
    local_dev: bool,
}

impl SourceLocation {
    pub fn new(
        production_base: impl Into<String>,
        dev_base: impl Into<String>,
        local_dev: bool,
    ) -> Self {
        Self {
            production_base: with_trailing_slash(production_base.into()),
            dev_base: with_trailing_slash(dev_base.into()),
            local_dev,
        }
    }

    /// Base URL in effect for manifest requests
    pub fn base(&self) -> &str {
        if self.local_dev {
            &self.dev_base
        } else {
            &self.production_base
        }
    }

    pub fn is_local_dev(&self) -> bool {
        self.local_dev
    }

    /// Absolute URL for a manifest path
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.base(), path.trim_start_matches('/'))
    }

    /// Manifest URL for a concrete selection, `None` for `All`
    pub fn manifest_url(&self, selection: CatalogSelection) -> Option<String> {
        selection.meta().path.map(|path| self.resolve(path))
    }

    /// URL users add to their installer app to subscribe to a source
    ///
    /// Always on the production base, even in local development, since it
    /// is meant to be shared.
    pub fn public_source_url(&self, selection: CatalogSelection) -> String {
        let path = selection
            .shareable()
            .meta()
            .path
            .unwrap_or("sources/standard/source.json");
        format!("{}{}", self.production_base, path)
    }
}

fn with_trailing_slash(mut base: String) -> String {
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}
