//! View models
//!
//! Pure functions from derived records and a language to display-ready
//! structures. Nothing here knows how the result is drawn.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::catalog::{AppRecord, Derived};
use crate::i18n::Language;
use crate::install::{install_links, InstallLink};
use crate::theme::{AppTheme, ThemeCache};

const SUMMARY_LIMIT: usize = 60;
const VERSION_BADGE_LIMIT: usize = 12;
const SEPARATOR: &str = "\n\n---\n\n";

static MAGIC_SEPARATOR_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[//\]:\s*\(ANI-SERVER-MAGIC-SEPARATOR\)").expect("valid regex")
});
static MAGIC_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(ANI-SERVER-MAGIC-SEPARATOR\)").expect("valid regex"));
static COMMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\[//\]:.*$").expect("valid regex"));
static LONG_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\n|^)\s*----\s*(\n|$)").expect("valid regex"));
static MD_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("valid regex"));
static MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));

/// Human-readable size, `N/A` for zero
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "N/A".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 10.0).round() / 10.0;

    if rounded.fract() == 0.0 {
        format!("{rounded:.0} {}", UNITS[exponent])
    } else {
        format!("{rounded:.1} {}", UNITS[exponent])
    }
}

/// Normalize source-specific markdown quirks before display
pub fn clean_markdown(text: &str) -> String {
    let text = MAGIC_SEPARATOR_COMMENT.replace_all(text, SEPARATOR);
    let text = MAGIC_SEPARATOR.replace_all(&text, SEPARATOR);
    let text = COMMENT_LINE.replace_all(&text, "");
    LONG_RULE.replace_all(&text, SEPARATOR).into_owned()
}

/// One-line card summary: images dropped, links reduced to their text
pub fn summarize(description: &str) -> String {
    let text = MD_IMAGE.replace_all(description, "");
    let text = MD_LINK.replace_all(&text, "$1");
    truncate_chars(text.trim(), SUMMARY_LIMIT)
}

/// Version label, shortened when unusually long
pub fn version_badge(version: &str) -> String {
    if version.chars().count() > VERSION_BADGE_LIMIT {
        format!("v{}", truncate_chars(version, VERSION_BADGE_LIMIT - 2))
    } else {
        format!("v{version}")
    }
}

/// Localized calendar date
pub fn format_date(date: DateTime<Utc>, lang: Language) -> String {
    match lang {
        Language::En => date.format("%b %-d, %Y").to_string(),
        Language::Zh => date.format("%Y年%-m月%-d日").to_string(),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// A card in the listing
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub key: String,
    pub name: String,
    pub developer: Option<String>,
    pub version: Option<String>,
    pub size: String,
    pub updated: Option<String>,
    pub summary: String,
    pub icon_url: Option<String>,
    pub theme: AppTheme,
    pub install: Vec<InstallLink>,
}

/// The listing area: either cards or the empty-state message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListingView {
    Empty {
        title: &'static str,
        description: &'static str,
    },
    Cards {
        cards: Vec<CardView>,
    },
}

/// Full detail for one record
#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub name: String,
    pub version: Option<String>,
    pub size: String,
    pub bundle_identifier: Option<String>,
    pub min_os_version: Option<String>,
    pub updated: Option<String>,
    /// Only set when it differs from the app name
    pub developer: Option<String>,
    pub description: String,
    pub changelog: Option<String>,
    pub icon_url: Option<String>,
    pub theme: AppTheme,
    pub install: Vec<InstallLink>,
}

pub fn card_view(app: &AppRecord, lang: Language, themes: &mut ThemeCache) -> CardView {
    CardView {
        key: app.dedup_key().to_string(),
        name: app.name.clone(),
        developer: app.developer_name.clone(),
        version: app.version.as_deref().map(version_badge),
        size: format_bytes(app.size),
        updated: app.parsed_date().map(|date| format_date(date, lang)),
        summary: app.long_description().map(summarize).unwrap_or_default(),
        icon_url: app.icon_url.clone(),
        theme: themes.theme_for(app).clone(),
        install: install_links(app),
    }
}

pub fn listing_view(derived: &Derived<'_>, lang: Language, themes: &mut ThemeCache) -> ListingView {
    match derived {
        Derived::Empty => {
            let messages = lang.messages();
            ListingView::Empty {
                title: messages.no_apps,
                description: messages.no_apps_desc,
            }
        }
        Derived::Apps(apps) => ListingView::Cards {
            cards: apps
                .iter()
                .map(|app| card_view(app, lang, themes))
                .collect(),
        },
    }
}

pub fn detail_view(app: &AppRecord, lang: Language, themes: &mut ThemeCache) -> DetailView {
    let messages = lang.messages();

    DetailView {
        name: app.name.clone(),
        version: app.version.clone(),
        size: format_bytes(app.size),
        bundle_identifier: app.bundle_identifier.clone(),
        min_os_version: app.min_os_version.clone(),
        updated: app.parsed_date().map(|date| format_date(date, lang)),
        developer: app
            .developer_name
            .clone()
            .filter(|developer| developer != &app.name),
        description: clean_markdown(app.long_description().unwrap_or(messages.no_description)),
        changelog: app.changelog().map(clean_markdown),
        icon_url: app.icon_url.clone(),
        theme: themes.theme_for(app).clone(),
        install: install_links(app),
    }
}
