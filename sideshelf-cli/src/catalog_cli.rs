//! Sideshelf catalog commands
//!
//! Browse a source, show one app, print install links, toggle the persisted
//! selection and list the available sources.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use sideshelf_core::catalog::{AppRecord, CatalogSelection, SortMode};
use sideshelf_core::config::ShelfConfig;
use sideshelf_core::i18n::{Language, Messages};
use sideshelf_core::install::InstallAction;
use sideshelf_core::state::{FileFragmentStore, FragmentStore, MemoryFragmentStore};
use sideshelf_core::theme::ThemeCache;
use sideshelf_core::view::{self, ListingView};
use sideshelf_core::{CatalogSession, SwitchOutcome};

/// Settings shared by every command
pub struct CommandContext {
    pub config: ShelfConfig,
    pub lang: Language,
    /// Write the selection fragment after successful loads
    pub persist: bool,
}

impl CommandContext {
    fn messages(&self) -> &'static Messages {
        self.lang.messages()
    }

    fn fragment_store(&self) -> Result<Box<dyn FragmentStore>> {
        if self.persist {
            Ok(Box::new(FileFragmentStore::in_default_location()?))
        } else {
            Ok(Box::new(MemoryFragmentStore::new()))
        }
    }

    fn open_session(&self) -> Result<CatalogSession> {
        let fetcher = self.config.build_fetcher()?;
        let mut session = CatalogSession::new(fetcher, self.fragment_store()?);
        session.set_language(self.lang);
        Ok(session)
    }

    /// Open a session and load `source`, or the persisted selection
    async fn load(&self, source: Option<CatalogSelection>, quiet: bool) -> Result<CatalogSession> {
        let mut session = self.open_session()?;
        let target = source.unwrap_or(session.state().current_source);

        if !quiet {
            eprintln!("Fetching {}...", self.selection_label(target));
        }

        let outcome = match source {
            Some(source) => session.switch_to(source).await,
            None => session.start().await,
        };
        self.report(outcome)?;

        Ok(session)
    }

    /// Print partial-load notices and failures; failures become errors
    fn report(&self, outcome: SwitchOutcome) -> Result<()> {
        match outcome {
            SwitchOutcome::Unchanged => Ok(()),
            SwitchOutcome::Loaded { missing, .. } => {
                if !missing.is_empty() {
                    let labels: Vec<&str> = missing
                        .iter()
                        .map(|selection| self.selection_label(*selection))
                        .collect();
                    eprintln!("{} ({})", self.messages().partial_source, labels.join(", "));
                }
                Ok(())
            }
            SwitchOutcome::Failed(affordance) => {
                eprintln!();
                eprintln!("{}", affordance.title);
                eprintln!("  {}", affordance.description);
                eprintln!();
                eprintln!(
                    "{}: sideshelf browse --source {}",
                    affordance.retry_label, affordance.retry_target
                );
                Err(affordance.error).context(format!(
                    "Failed to load '{}'",
                    affordance.retry_target
                ))
            }
        }
    }

    fn selection_label(&self, selection: CatalogSelection) -> &'static str {
        self.messages()
            .label(selection.meta().label_key)
            .unwrap_or_else(|| selection.key())
    }
}

/// Table row for the app listing
#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Developer")]
    developer: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

pub async fn execute_browse(
    ctx: &CommandContext,
    source: Option<CatalogSelection>,
    query: Option<String>,
    sort: Option<SortMode>,
    json_output: bool,
) -> Result<()> {
    let mut session = ctx.load(source, json_output).await?;

    if let Some(sort) = sort {
        session.set_sort(sort);
    }

    let derived = session.derive(query.as_deref().unwrap_or(""));
    let mut themes = ThemeCache::new();
    let listing = view::listing_view(&derived, ctx.lang, &mut themes);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let state = session.state();
    let sort_label = ctx
        .messages()
        .label(state.current_sort.label_key())
        .unwrap_or_else(|| state.current_sort.key());

    match listing {
        ListingView::Empty { title, description } => {
            println!();
            println!("{title}");
            println!("  {description}");
        }
        ListingView::Cards { cards } => {
            println!(
                "\n{} · {} · {}\n",
                ctx.selection_label(state.current_source),
                sort_label,
                cards.len()
            );

            let rows: Vec<AppRow> = cards
                .into_iter()
                .map(|card| AppRow {
                    name: card.name,
                    version: card.version.unwrap_or_default(),
                    developer: card.developer.unwrap_or_default(),
                    size: card.size,
                    updated: card.updated.unwrap_or_default(),
                    summary: card.summary,
                })
                .collect();

            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()))
                .to_string();

            println!("{table}");
        }
    }

    Ok(())
}

fn find_app<'a>(session: &'a CatalogSession, identifier: &str) -> Result<&'a AppRecord> {
    session.state().find(identifier).with_context(|| {
        format!(
            "App '{}' not found in '{}'",
            identifier,
            session.state().current_source
        )
    })
}

pub async fn execute_show(
    ctx: &CommandContext,
    identifier: &str,
    source: Option<CatalogSelection>,
    json_output: bool,
) -> Result<()> {
    let session = ctx.load(source, json_output).await?;
    let app = find_app(&session, identifier)?;

    let mut themes = ThemeCache::new();
    let detail = view::detail_view(app, ctx.lang, &mut themes);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let messages = ctx.messages();
    let na = "-".to_string();

    println!();
    match &detail.version {
        Some(version) => println!("{} {}", detail.name, view::version_badge(version)),
        None => println!("{}", detail.name),
    }
    if let Some(developer) = &detail.developer {
        println!("{}: {}", messages.developer, developer);
    }
    println!(
        "{}: {}",
        messages.bundle_id,
        detail.bundle_identifier.as_ref().unwrap_or(&na)
    );
    println!("{}: {}", messages.size, detail.size);
    println!(
        "{}: {}",
        messages.min_os,
        detail.min_os_version.as_ref().unwrap_or(&na)
    );
    println!(
        "{}: {}",
        messages.updated,
        detail.updated.as_ref().unwrap_or(&na)
    );

    println!();
    println!("{}:", messages.description);
    for line in detail.description.lines() {
        println!("  {line}");
    }

    println!();
    println!("{}:", messages.whats_new);
    match &detail.changelog {
        Some(changelog) => {
            for line in changelog.lines() {
                println!("  {line}");
            }
        }
        None => println!("  {}", messages.no_changelog),
    }

    if !detail.install.is_empty() {
        println!();
        println!("{}:", messages.install);
        for link in &detail.install {
            let label = messages
                .label(link.action.label_key())
                .unwrap_or_else(|| link.action.key());
            println!("  {label:<14} {}", link.url);
        }
    }

    Ok(())
}

pub async fn execute_install(
    ctx: &CommandContext,
    identifier: &str,
    via: InstallAction,
    source: Option<CatalogSelection>,
) -> Result<()> {
    let session = ctx.load(source, false).await?;
    let app = find_app(&session, identifier)?;

    let Some(url) = via.url_for_app(app) else {
        bail!("'{}' has no download URL", app.name);
    };

    eprintln!("{}", ctx.messages().risk_warning);
    println!("{url}");
    Ok(())
}

pub async fn execute_toggle(ctx: &CommandContext) -> Result<()> {
    let mut session = ctx.open_session()?;
    let from = session.state().current_source;

    let outcome = session.toggle().await;
    let count = match &outcome {
        SwitchOutcome::Loaded { count, .. } => *count,
        _ => session.state().current_apps.len(),
    };
    ctx.report(outcome)?;

    println!(
        "{} -> {} ({count})",
        ctx.selection_label(from),
        ctx.selection_label(session.state().current_source)
    );
    Ok(())
}

/// One row of `sideshelf sources`
#[derive(Tabled, Serialize)]
struct SourceRow {
    #[tabled(rename = "")]
    #[serde(skip)]
    marker: &'static str,
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Theme")]
    theme_color: &'static str,
    #[tabled(rename = "Manifest")]
    manifest: String,
    #[tabled(rename = "Public URL")]
    public_url: String,
    #[tabled(skip)]
    current: bool,
}

pub fn execute_sources(ctx: &CommandContext, json_output: bool) -> Result<()> {
    let location = ctx.config.location();
    let current = ctx.fragment_store()?.initial_selection();

    let rows: Vec<SourceRow> = CatalogSelection::ALL
        .into_iter()
        .map(|selection| {
            let meta = selection.meta();
            SourceRow {
                marker: if selection == current { "*" } else { "" },
                key: selection.key(),
                label: ctx.selection_label(selection),
                theme_color: meta.theme_color,
                manifest: location
                    .manifest_url(selection)
                    .unwrap_or_else(|| "standard + nsfw".to_string()),
                public_url: location.public_source_url(selection),
                current: selection == current,
            }
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if location.is_local_dev() {
        println!("Local development: {}", location.base());
    }

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");
    Ok(())
}
