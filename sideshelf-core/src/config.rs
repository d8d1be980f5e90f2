//! User configuration
//!
//! Loaded from `config.yaml` in the user's config directory. Every field has
//! a default, so a missing file is the same as an empty one.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{HttpTransport, ManifestFetcher, ManifestTransport, SourceLocation};
use crate::i18n::Language;

/// Published location of the source manifests
pub const DEFAULT_PRODUCTION_BASE: &str =
    "https://raw.githubusercontent.com/Aiko3993/iOS-Sideload-Source/gh-pages/";

/// Local development server
pub const DEFAULT_DEV_BASE: &str = "http://localhost:8000/";

/// Set to `1` or `true` to load manifests from the dev base
pub const ENV_LOCAL_DEV: &str = "SIDESHELF_LOCAL_DEV";

/// Replaces the production base
pub const ENV_BASE_URL: &str = "SIDESHELF_BASE_URL";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub production_base: String,
    pub dev_base: String,
    pub local_dev: bool,
    pub user_agent: String,
    /// Request timeout; reqwest's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    /// Display language; detected from the locale when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            production_base: DEFAULT_PRODUCTION_BASE.to_string(),
            dev_base: DEFAULT_DEV_BASE.to_string(),
            local_dev: false,
            user_agent: concat!("sideshelf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: None,
            language: None,
        }
    }
}

impl ShelfConfig {
    /// Load from the default location, applying environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path(&default_config_path()?)
    }

    /// Load from a specific file, applying environment overrides
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Apply `SIDESHELF_LOCAL_DEV` and `SIDESHELF_BASE_URL`
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(ENV_LOCAL_DEV) {
            self.local_dev = matches!(value.trim(), "1" | "true" | "TRUE" | "yes");
        }

        if let Ok(base) = std::env::var(ENV_BASE_URL) {
            let base = base.trim();
            if !base.is_empty() {
                tracing::debug!("Production base overridden to {}", base);
                self.production_base = base.to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, base) in [
            ("production_base", &self.production_base),
            ("dev_base", &self.dev_base),
        ] {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                bail!("{field} must be an http(s) URL, got '{base}'");
            }
        }

        if self.timeout_seconds == Some(0) {
            bail!("timeout_seconds must be greater than zero");
        }

        Ok(())
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(&self.production_base, &self.dev_base, self.local_dev)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Production fetcher over HTTP
    pub fn build_fetcher(&self) -> Result<ManifestFetcher> {
        let transport = HttpTransport::new(&self.user_agent, self.timeout())
            .context("Failed to build HTTP client")?;
        let transport: Arc<dyn ManifestTransport> = Arc::new(transport);
        Ok(ManifestFetcher::new(transport, self.location()))
    }

    /// Configured language, else the detected locale
    pub fn language(&self) -> Language {
        self.language.unwrap_or_else(Language::detect)
    }
}

/// `<config dir>/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("io", "sideshelf", "sideshelf")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .or_else(|| dirs::config_dir().map(|d| d.join("sideshelf")))
        .context("Could not determine config directory")?;

    Ok(config_dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var(ENV_LOCAL_DEV);
        std::env::remove_var(ENV_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_missing_file_gives_defaults() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let config = ShelfConfig::load_from_path(&temp.path().join("config.yaml")).unwrap();

        assert_eq!(config, ShelfConfig::default());
        assert_eq!(config.location().base(), DEFAULT_PRODUCTION_BASE);
    }

    #[test]
    #[serial]
    fn test_partial_file_keeps_other_defaults() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "local_dev: true\ntimeout_seconds: 5\nlanguage: en\n").unwrap();

        let config = ShelfConfig::load_from_path(&path).unwrap();
        assert!(config.local_dev);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.language, Some(Language::En));
        assert_eq!(config.production_base, DEFAULT_PRODUCTION_BASE);
        assert_eq!(config.location().base(), DEFAULT_DEV_BASE);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var(ENV_LOCAL_DEV, "1");
        std::env::set_var(ENV_BASE_URL, "https://mirror.example.com/shelf");

        let temp = TempDir::new().unwrap();
        let config = ShelfConfig::load_from_path(&temp.path().join("none.yaml")).unwrap();
        clear_env();

        assert!(config.local_dev);
        assert_eq!(config.production_base, "https://mirror.example.com/shelf");
        assert_eq!(
            config.location().public_source_url(crate::catalog::CatalogSelection::Standard),
            "https://mirror.example.com/shelf/sources/standard/source.json"
        );
    }

    #[test]
    #[serial]
    fn test_rejects_non_http_base() {
        clear_env();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "production_base: file:///tmp/source\n").unwrap();

        let err = ShelfConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("production_base"));
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(ShelfConfig::from_yaml("  \n").unwrap(), ShelfConfig::default());
    }
}
