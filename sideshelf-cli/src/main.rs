//! Sideshelf - browse sideload app sources from the terminal
//!
//! Fetches the published source manifests, filters and sorts them, and
//! prints install links for companion installer apps.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sideshelf_core::catalog::{CatalogSelection, SortMode};
use sideshelf_core::config::ShelfConfig;
use sideshelf_core::i18n::Language;
use sideshelf_core::install::InstallAction;

mod catalog_cli;

use catalog_cli::CommandContext;

/// Trace modules for structured tracing
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
enum TraceModule {
    Fetch,
    State,
    Session,
    All,
}

/// Log levels
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "sideshelf",
    about = "Browse sideload app sources and build install links",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Enable structured tracing (comma-separated: fetch,state,session,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Override configuration file path
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Display language (en, zh)
    #[clap(long, global = true)]
    lang: Option<Language>,

    /// Do not remember the selected source
    #[clap(long, global = true)]
    no_persist: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// List apps in a source
    Browse {
        /// Source to load (standard, nsfw, all); defaults to the last one used
        #[clap(long)]
        source: Option<CatalogSelection>,

        /// Search name, developer, bundle identifier and description
        #[clap(long, short)]
        query: Option<String>,

        /// Sort order (date, name, size)
        #[clap(long)]
        sort: Option<SortMode>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show details for one app
    Show {
        /// Bundle identifier or app name
        app: String,

        /// Source to load
        #[clap(long)]
        source: Option<CatalogSelection>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print an install link for one app
    Install {
        /// Bundle identifier or app name
        app: String,

        /// Installer to target (download, altstore, sidestore, livecontainer)
        #[clap(long, default_value = "download")]
        via: InstallAction,

        /// Source to load
        #[clap(long)]
        source: Option<CatalogSelection>,
    },

    /// Advance to the next source (standard -> nsfw -> all) and load it
    Toggle,

    /// List available sources and their manifest URLs
    Sources {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Initialize tracing with CLI flags
///
/// When --trace is set, switches to JSON output for structured tracing.
fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directive = match module {
            TraceModule::Fetch => "sideshelf_core::catalog=trace",
            TraceModule::State => "sideshelf_core::state=trace",
            TraceModule::Session => "sideshelf_core::session=trace",
            TraceModule::All => "sideshelf_core=trace",
        };

        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    // Logs go to stderr so --json output stays parseable
    if !trace_modules.is_empty() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "Sideshelf tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let config = match &cli.config {
        Some(path) => ShelfConfig::load_from_path(path)?,
        None => ShelfConfig::load()?,
    };
    let lang = cli.lang.unwrap_or_else(|| config.language());

    let ctx = CommandContext {
        config,
        lang,
        persist: !cli.no_persist,
    };

    match cli.command {
        Command::Browse {
            source,
            query,
            sort,
            json,
        } => catalog_cli::execute_browse(&ctx, source, query, sort, json).await,
        Command::Show { app, source, json } => {
            catalog_cli::execute_show(&ctx, &app, source, json).await
        }
        Command::Install { app, via, source } => {
            catalog_cli::execute_install(&ctx, &app, via, source).await
        }
        Command::Toggle => catalog_cli::execute_toggle(&ctx).await,
        Command::Sources { json } => catalog_cli::execute_sources(&ctx, json),
    }
}
