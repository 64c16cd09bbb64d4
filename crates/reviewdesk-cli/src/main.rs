use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use reviewdesk_core::{ColumnSet, DateQuery, SessionStore};
use reviewdesk_store::{DocumentStore, FileStore};
use tracing_subscriber::EnvFilter;

mod config;
mod dashboard;
mod display;
mod interactive;
mod report;

use config::{DeskConfig, StoreKind};
use dashboard::{Dashboard, FetchOutcome};

#[derive(Parser)]
#[command(name = "reviewdesk", version, about = "Compliance review desk")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "REVIEWDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Read documents from this JSON / JSON Lines export instead of the configured store.
    #[arg(long, global = true, env = "REVIEWDESK_DOCUMENTS")]
    documents: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List records created on a date.
    Fetch {
        /// Review date, YYYY-MM-DD (default: today).
        #[arg(long)]
        date: Option<DateQuery>,
    },
    /// Show a record's findings.
    Show {
        #[arg(long)]
        date: Option<DateQuery>,
        /// Record id (default: first record of the day).
        #[arg(long)]
        record: Option<String>,
        #[arg(long, default_value = "strict")]
        columns: ColumnSet,
    },
    /// Export a record's findings to compliance_<id>.csv.
    Export {
        #[arg(long)]
        date: Option<DateQuery>,
        #[arg(long)]
        record: String,
        #[arg(long, default_value = "strict")]
        columns: ColumnSet,
        /// Output directory.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print a time-limited download link for a record's source PDF.
    PdfLink {
        #[arg(long)]
        date: Option<DateQuery>,
        #[arg(long)]
        record: String,
        /// Link lifetime in minutes, 1 to 10080 (default from config, normally 15).
        #[arg(long)]
        expires_minutes: Option<u64>,
    },
    /// Interactive session over one review date.
    Session {
        #[arg(long)]
        date: Option<DateQuery>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("reviewdesk v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = DeskConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let store = open_store(&config, cli.documents.as_deref()).await?;
    let mut dashboard = Dashboard::new(store, SessionStore::new(), config.signing.clone());

    match cli.command {
        Command::Fetch { date } => {
            report::fetch(&mut dashboard, date.unwrap_or_else(today)).await?;
        }
        Command::Show {
            date,
            record,
            columns,
        } => {
            if load(&mut dashboard, date, record.as_deref()).await? {
                report::findings(&dashboard, columns)?;
            }
        }
        Command::Export {
            date,
            record,
            columns,
            out,
        } => {
            if load(&mut dashboard, date, Some(&record)).await? {
                report::export(&dashboard, &out, columns)?;
            }
        }
        Command::PdfLink {
            date,
            record,
            expires_minutes,
        } => {
            let expires = dashboard.link_expiry(expires_minutes)?;
            if load(&mut dashboard, date, Some(&record)).await? {
                report::pdf_link(&dashboard, expires);
            }
        }
        Command::Session { date } => {
            let stdin = std::io::stdin();
            interactive::run(
                &mut dashboard,
                date.unwrap_or_else(today),
                stdin.lock(),
                std::io::stdout(),
            )
            .await?;
        }
    }
    Ok(())
}

fn today() -> DateQuery {
    DateQuery::for_day(chrono::Local::now().date_naive())
}

/// Fetch the day's records and select `record` (or the first). Returns false
/// when there is nothing to show.
async fn load(
    dashboard: &mut Dashboard,
    date: Option<DateQuery>,
    record: Option<&str>,
) -> anyhow::Result<bool> {
    let date = date.unwrap_or_else(today);
    if dashboard.fetch(date).await? == FetchOutcome::Empty {
        println!("No records for {}. Pick another date and fetch again.", date.day());
        return Ok(false);
    }
    if let Some(id) = record {
        dashboard.select(id)?;
    }
    Ok(true)
}

async fn open_store(
    config: &DeskConfig,
    documents: Option<&Path>,
) -> anyhow::Result<Box<dyn DocumentStore>> {
    if let Some(path) = documents {
        return Ok(Box::new(FileStore::open(path).await?));
    }
    match config.store.kind {
        StoreKind::File => Ok(Box::new(
            FileStore::open(&config.store.path)
                .await
                .with_context(|| format!("opening {}", config.store.path.display()))?,
        )),
        StoreKind::DataApi => open_data_api(config),
    }
}

#[cfg(feature = "http")]
fn open_data_api(config: &DeskConfig) -> anyhow::Result<Box<dyn DocumentStore>> {
    let s = &config.store;
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    Ok(Box::new(reviewdesk_store::DataApiStore::new(
        reviewdesk_store::DataApiConfig {
            base_url: field(&s.base_url),
            api_key: field(&s.api_key),
            data_source: field(&s.data_source),
            database: field(&s.database),
            collection: field(&s.collection),
        },
    )))
}

#[cfg(not(feature = "http"))]
fn open_data_api(_config: &DeskConfig) -> anyhow::Result<Box<dyn DocumentStore>> {
    anyhow::bail!("the data_api store needs the `http` feature")
}
