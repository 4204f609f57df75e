//! tabfile - browse directories through a live session.
//!
//! Usage:
//!   tabfile ls [PATH]            List a directory, folders first
//!   tabfile roots                List drives and mount points
//!   tabfile search QUERY         Search file names below a folder
//!   tabfile watch [PATH]         Print changes as the session applies them
//!   tabfile --help               Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use tabfile_core::{ItemKind, ItemRecord, Location, SessionConfig};
use tabfile_scan::{LocalQueryProvider, NotifyChangeNotifier};
use tabfile_session::{DirectorySession, Reconciled, SessionEvent};

#[derive(Parser)]
#[command(
    name = "tabfile",
    version,
    about = "Browse directories through a live tab session",
    long_about = "tabfile drives the same session engine a file browser tab uses: \
                  enumeration, change tracking and search, printed to the terminal."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory, folders before files
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List drives and mount points
    Roots {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search file names below a folder
    Search {
        /// Substring or glob (`*.rs`) to match against file names
        query: String,

        /// Folder to search below
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Maximum number of results
        #[arg(short, long)]
        max: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Keep a session open and print changes as they are applied
    Watch {
        /// Directory to watch
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Stop after this many seconds (runs until killed otherwise)
        #[arg(short, long)]
        seconds: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = SessionConfig::load();

    match cli.command {
        Command::Ls { path, format } => run_ls(config, &path, format).await,
        Command::Roots { format } => run_roots(config, format).await,
        Command::Search {
            query,
            root,
            max,
            format,
        } => run_search(config, &query, &root, max, format).await,
        Command::Watch { path, seconds } => run_watch(config, &path, seconds).await,
    }
}

/// Log to stderr, filtered by `TABFILE_LOG` (warnings only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TABFILE_LOG").unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn new_session(config: SessionConfig) -> DirectorySession {
    DirectorySession::new(config, Arc::new(NotifyChangeNotifier::new()))
}

/// Navigate and wait for the listing, surfacing enumeration errors.
async fn open(session: &mut DirectorySession, location: Location) -> Result<()> {
    let label = location.to_string();
    session
        .navigate_to(location, true, None)
        .with_context(|| format!("Cannot open {label}"))?;
    for event in session.settle().await {
        if let SessionEvent::Error(err) = event {
            return Err::<(), _>(err).with_context(|| format!("Cannot list {label}"));
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Invalid path: {}", path.display()))
}

async fn run_ls(config: SessionConfig, path: &Path, format: OutputFormat) -> Result<()> {
    let path = absolute(path)?;
    let mut session = new_session(config);
    open(&mut session, Location::from_path(&path)).await?;
    print_items(session.items(), format)
}

async fn run_roots(config: SessionConfig, format: OutputFormat) -> Result<()> {
    let mut session = new_session(config);
    open(&mut session, Location::Roots).await?;
    print_items(session.items(), format)
}

async fn run_search(
    mut config: SessionConfig,
    query: &str,
    root: &Path,
    max: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    if query.trim().is_empty() {
        bail!("Search query cannot be empty");
    }
    let root = absolute(root)?;
    if let Some(max) = max {
        config.max_search_results = max;
    }

    let provider = LocalQueryProvider::new(&root).with_hidden(config.include_hidden);
    let mut session = new_session(config).with_query_provider(Arc::new(provider));
    open(&mut session, Location::from_path(&root)).await?;

    eprintln!("Searching {} for {query:?}...", root.display());
    session.update_search(query).context("Search failed")?;
    session.settle().await;
    print_items(session.items(), format)
}

async fn run_watch(config: SessionConfig, path: &Path, seconds: Option<u64>) -> Result<()> {
    let path = absolute(path)?;
    let mut session = new_session(config);
    open(&mut session, Location::from_path(&path)).await?;
    eprintln!(
        "Watching {} ({} items)...",
        path.display(),
        session.items().len()
    );

    let deadline = seconds.map(|s| tokio::time::Instant::now() + Duration::from_secs(s));
    let expired = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(expired);

    loop {
        tokio::select! {
            message = session.next_message() => {
                let Some(message) = message else { break };
                for event in session.apply(message) {
                    print_event(&session, &event);
                }
            }
            _ = &mut expired => break,
        }
    }
    Ok(())
}

fn print_items(items: &[ItemRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!(
                    "{:<10} {:>10}  {:<16}  {}",
                    kind_label(item.kind),
                    item.size.map(format_size).unwrap_or_default(),
                    item.modified.map(format_time).unwrap_or_default(),
                    display_name(item)
                );
            }
            eprintln!("{} item(s)", items.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
    }
    Ok(())
}

fn print_event(session: &DirectorySession, event: &SessionEvent) {
    match event {
        SessionEvent::Reconciled(Reconciled::Added { id, .. }) => println!("+ {id}"),
        SessionEvent::Reconciled(Reconciled::Removed { id, .. }) => println!("- {id}"),
        SessionEvent::Reconciled(Reconciled::Renamed { from, to, .. }) => {
            println!("~ {from} -> {to}")
        }
        SessionEvent::Reconciled(Reconciled::Refreshed { index }) => {
            if let Some(item) = session.items().get(*index) {
                println!(
                    "* {} {}",
                    item.id,
                    item.size.map(format_size).unwrap_or_default()
                );
            }
        }
        SessionEvent::Loaded { location, count } => println!("= {location} ({count} items)"),
        SessionEvent::SearchCompleted { query, count } => println!("? {query} ({count} hits)"),
        SessionEvent::Degraded { message } => eprintln!("! {message} (run again to refresh)"),
        SessionEvent::Error(err) => eprintln!("error: {err}"),
    }
}

fn kind_label(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::File => "file",
        ItemKind::Directory => "dir",
        ItemKind::Drive => "root",
        ItemKind::SearchHit { is_dir: true } => "hit/dir",
        ItemKind::SearchHit { is_dir: false } => "hit",
    }
}

/// Search hits show their full path, everything else its name.
fn display_name(item: &ItemRecord) -> String {
    match item.kind {
        ItemKind::SearchHit { .. } => item.id.to_string(),
        _ if item.is_dir() && item.kind != ItemKind::Drive => format!("{}/", item.display_name),
        _ => item.display_name.to_string(),
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

fn format_time(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
