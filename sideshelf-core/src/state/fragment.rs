//! Selection fragment persistence
//!
//! The only persisted piece of state is the selection fragment (`#standard`,
//! `#nsfw`, `#all`). It is read once at startup and rewritten after every
//! successful switch.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::catalog::CatalogSelection;

/// Fragment file name inside the state directory
const FRAGMENT_FILE: &str = "fragment";

/// Storage for the selection fragment
pub trait FragmentStore: Send + Sync {
    /// Raw stored fragment, if any
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored fragment
    fn write(&self, fragment: &str) -> Result<()>;

    /// Initial selection: the stored fragment if it names a selection,
    /// otherwise `standard`
    fn initial_selection(&self) -> CatalogSelection {
        match self.read() {
            Ok(Some(fragment)) => CatalogSelection::from_fragment(&fragment).unwrap_or_else(|| {
                tracing::debug!("Ignoring unknown fragment '{}'", fragment.trim());
                CatalogSelection::default()
            }),
            Ok(None) => CatalogSelection::default(),
            Err(e) => {
                tracing::warn!("Failed to read selection fragment: {:#}", e);
                CatalogSelection::default()
            }
        }
    }
}

/// Fragment kept in a small file
pub struct FileFragmentStore {
    path: PathBuf,
}

impl FileFragmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user's state directory
    pub fn in_default_location() -> Result<Self> {
        Ok(Self::new(default_state_dir()?.join(FRAGMENT_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FragmentStore for FileFragmentStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read fragment: {}", self.path.display()))?;

        Ok(Some(content.trim().to_string()))
    }

    fn write(&self, fragment: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        std::fs::write(&self.path, format!("{fragment}\n"))
            .with_context(|| format!("Failed to write fragment: {}", self.path.display()))?;

        tracing::debug!("Saved fragment {} to {}", fragment, self.path.display());
        Ok(())
    }
}

/// Fragment held in memory only; forgotten when the process exits
#[derive(Default)]
pub struct MemoryFragmentStore {
    fragment: Mutex<Option<String>>,
}

impl MemoryFragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragment(fragment: &str) -> Self {
        Self {
            fragment: Mutex::new(Some(fragment.to_string())),
        }
    }
}

impl FragmentStore for MemoryFragmentStore {
    fn read(&self) -> Result<Option<String>> {
        let guard = self
            .fragment
            .lock()
            .map_err(|_| anyhow::anyhow!("Fragment lock poisoned"))?;
        Ok(guard.clone())
    }

    fn write(&self, fragment: &str) -> Result<()> {
        let mut guard = self
            .fragment
            .lock()
            .map_err(|_| anyhow::anyhow!("Fragment lock poisoned"))?;
        *guard = Some(fragment.to_string());
        Ok(())
    }
}

/// Per-user state directory
fn default_state_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("io", "sideshelf", "sideshelf")
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .to_path_buf()
        })
        .or_else(|| dirs::data_local_dir().map(|d| d.join("sideshelf")))
        .context("Could not determine state directory")
}
