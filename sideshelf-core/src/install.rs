//! Install action links
//!
//! The catalog only builds URLs. Opening them (and whatever installer app
//! handles the scheme) happens outside this crate.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::catalog::AppRecord;

/// A way to get a package onto a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallAction {
    /// Raw package download
    Download,
    AltStore,
    SideStore,
    LiveContainer,
}

impl InstallAction {
    /// Every action, in display order
    pub const ALL: [InstallAction; 4] = [
        InstallAction::Download,
        InstallAction::AltStore,
        InstallAction::SideStore,
        InstallAction::LiveContainer,
    ];

    pub fn key(self) -> &'static str {
        match self {
            InstallAction::Download => "download",
            InstallAction::AltStore => "altstore",
            InstallAction::SideStore => "sidestore",
            InstallAction::LiveContainer => "livecontainer",
        }
    }

    /// Message key for the button label
    pub fn label_key(self) -> &'static str {
        match self {
            InstallAction::Download => "ipa",
            InstallAction::AltStore => "installAltStore",
            InstallAction::SideStore => "installSideStore",
            InstallAction::LiveContainer => "installLiveContainer",
        }
    }

    /// Build the link for a package URL
    pub fn url_for(self, package_url: &str) -> String {
        let scheme = match self {
            InstallAction::Download => return package_url.to_string(),
            InstallAction::AltStore => "altstore",
            InstallAction::SideStore => "sidestore",
            InstallAction::LiveContainer => "livecontainer",
        };
        format!(
            "{scheme}://install?url={}",
            urlencoding::encode(package_url)
        )
    }

    /// Build the link for a record, `None` when it has no package URL
    pub fn url_for_app(self, app: &AppRecord) -> Option<String> {
        app.download_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| self.url_for(url))
    }
}

impl fmt::Display for InstallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InstallAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstallAction::ALL
            .into_iter()
            .find(|action| action.key() == s.to_lowercase())
            .ok_or_else(|| {
                format!("Unknown install action '{s}' (expected download, altstore, sidestore or livecontainer)")
            })
    }
}

/// One resolved install link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallLink {
    pub action: InstallAction,
    pub url: String,
}

/// All install links for a record, in display order
pub fn install_links(app: &AppRecord) -> Vec<InstallLink> {
    InstallAction::ALL
        .into_iter()
        .filter_map(|action| {
            action
                .url_for_app(app)
                .map(|url| InstallLink { action, url })
        })
        .collect()
}
