//! Display languages and the message table
//!
//! Only the strings the catalog flow and CLI actually surface live here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Zh,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// Pick a language from a locale string such as `zh_CN.UTF-8` or `en-US`
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_lowercase().starts_with("zh") {
            Language::Zh
        } else {
            Language::En
        }
    }

    /// Detect from `LC_ALL`, `LC_MESSAGES` then `LANG`
    ///
    /// Falls back to English when none is set, since an unset locale
    /// usually means a bare container or CI shell.
    pub fn detect() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .map(|value| Self::from_locale(&value))
            .unwrap_or(Language::En)
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(format!("Unsupported language '{other}' (expected en or zh)")),
        }
    }
}

/// Localized strings
#[derive(Debug)]
pub struct Messages {
    pub source_all: &'static str,
    pub source_standard: &'static str,
    pub source_nsfw: &'static str,
    pub sort_latest: &'static str,
    pub sort_name: &'static str,
    pub sort_size: &'static str,
    pub no_apps: &'static str,
    pub no_apps_desc: &'static str,
    pub load_failed_title: &'static str,
    pub load_failed_desc: &'static str,
    pub retry: &'static str,
    pub no_description: &'static str,
    pub no_changelog: &'static str,
    pub description: &'static str,
    pub whats_new: &'static str,
    pub bundle_id: &'static str,
    pub min_os: &'static str,
    pub size: &'static str,
    pub updated: &'static str,
    pub developer: &'static str,
    pub install: &'static str,
    pub download: &'static str,
    pub install_altstore: &'static str,
    pub install_sidestore: &'static str,
    pub install_livecontainer: &'static str,
    pub partial_source: &'static str,
    pub risk_warning: &'static str,
}

impl Messages {
    /// Look up a label by its message key
    pub fn label(&self, key: &str) -> Option<&'static str> {
        let text = match key {
            "sourceAll" => self.source_all,
            "sourceStandard" => self.source_standard,
            "sourceNSFW" => self.source_nsfw,
            "sortLatest" => self.sort_latest,
            "sortName" => self.sort_name,
            "sortSize" => self.sort_size,
            "ipa" => self.download,
            "installAltStore" => self.install_altstore,
            "installSideStore" => self.install_sidestore,
            "installLiveContainer" => self.install_livecontainer,
            _ => return None,
        };
        Some(text)
    }
}

static EN: Messages = Messages {
    source_all: "All Apps",
    source_standard: "Standard",
    source_nsfw: "NSFW",
    sort_latest: "Latest",
    sort_name: "Name",
    sort_size: "Size",
    no_apps: "No apps found",
    no_apps_desc: "Try adjusting your search or switching sources.",
    load_failed_title: "Failed to load source",
    load_failed_desc:
        "Could not load apps. Please check your internet connection or try again later.",
    retry: "Retry",
    no_description: "No description available.",
    no_changelog: "No changelog available.",
    description: "Description",
    whats_new: "What's New",
    bundle_id: "Bundle ID",
    min_os: "Min OS",
    size: "Size",
    updated: "Updated",
    developer: "Developer",
    install: "Install",
    download: "IPA",
    install_altstore: "AltStore",
    install_sidestore: "SideStore",
    install_livecontainer: "LiveContainer",
    partial_source: "Some sources could not be loaded; the list may be incomplete",
    risk_warning: "Third-party Source - use at your own risk",
};

static ZH: Messages = Messages {
    source_all: "全部应用",
    source_standard: "标准",
    source_nsfw: "NSFW",
    sort_latest: "最新",
    sort_name: "名称",
    sort_size: "大小",
    no_apps: "未找到应用",
    no_apps_desc: "尝试调整搜索关键词或切换源。",
    load_failed_title: "无法加载源",
    load_failed_desc: "无法加载应用列表，请检查您的网络连接或稍后重试。",
    retry: "重试",
    no_description: "暂无描述。",
    no_changelog: "暂无更新日志。",
    description: "应用介绍",
    whats_new: "更新日志",
    bundle_id: "包名",
    min_os: "最低系统",
    size: "大小",
    updated: "更新时间",
    developer: "开发者",
    install: "安装",
    download: "IPA",
    install_altstore: "AltStore",
    install_sidestore: "SideStore",
    install_livecontainer: "LiveContainer",
    partial_source: "部分源加载失败，列表可能不完整",
    risk_warning: "第三方源 - 后果自负",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_locale() {
        assert_eq!(Language::from_locale("zh_CN.UTF-8"), Language::Zh);
        assert_eq!(Language::from_locale("zh-Hant"), Language::Zh);
        assert_eq!(Language::from_locale("en_US.UTF-8"), Language::En);
        assert_eq!(Language::from_locale("C"), Language::En);
    }

    #[test]
    fn test_labels_resolve_for_every_selection() {
        use crate::catalog::CatalogSelection;

        for lang in [Language::En, Language::Zh] {
            for selection in CatalogSelection::ALL {
                assert!(lang.messages().label(selection.meta().label_key).is_some());
            }
        }
        assert_eq!(Language::En.messages().label("unknown"), None);
    }

    #[test]
    fn test_detail_headings_are_translated() {
        assert_eq!(Language::En.messages().size, "Size");
        assert_eq!(Language::En.messages().install, "Install");
        assert_eq!(Language::Zh.messages().size, "大小");
        assert_eq!(Language::Zh.messages().install, "安装");
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }
}
