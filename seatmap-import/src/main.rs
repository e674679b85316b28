//! seatmap-import - seating import command-line tool
//!
//! Loads event documents into the local store, previews or applies seating
//! imports, and runs background import jobs. Every command prints JSON on
//! stdout; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seatmap_common::config::{load_toml_config, RootFolderInitializer, RootFolderResolver};
use seatmap_common::Event;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use seatmap_import::import::load_event;
use seatmap_import::services::event_stats;
use seatmap_import::{
    apply_import, get_job_status, parse_rows, preview_import_for, recover_jobs, ColumnMapping,
    EventStore, ImportQueue, ImportRequest, ImportSettings, SqliteStore, UuidTableIds,
};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", ",
    env!("BUILD_PROFILE"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "seatmap-import", version = VERSION, about = "Seating import reconciliation")]
struct Args {
    /// Root folder holding seatmap.db
    #[arg(long, env = "SEATMAP_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(long, env = "SEATMAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store an event document (JSON file)
    EventLoad { file: PathBuf },

    /// Classify rows against an event without writing
    Preview {
        event_id: String,
        csv: PathBuf,
        /// Column mapping as inline JSON
        #[arg(long)]
        mapping: Option<String>,
    },

    /// Apply rows to an event in one pass
    Apply {
        event_id: String,
        csv: PathBuf,
        #[arg(long)]
        mapping: Option<String>,
        #[arg(long)]
        create_missing_tables: bool,
    },

    /// Queue a background import job
    Submit {
        event_id: String,
        csv: PathBuf,
        #[arg(long)]
        mapping: Option<String>,
        #[arg(long)]
        create_missing_tables: bool,
        /// Poll until the job finishes
        #[arg(long)]
        wait: bool,
    },

    /// Show a job's status
    Job { job_id: Uuid },

    /// Fail jobs left running by a dead process and finish pending ones.
    /// Only run this while no other seatmap-import process is working.
    Recover,

    /// Guest counters across all events
    Stats,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_mapping(json: Option<&str>) -> Result<ColumnMapping> {
    match json {
        Some(json) => ColumnMapping::from_json(json).context("Invalid column mapping"),
        None => Ok(ColumnMapping::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("seatmap-import {}", VERSION);

    let root_folder = RootFolderResolver::new("seatmap")
        .with_cli_arg(args.root_folder.clone())
        .with_toml_config(&toml_config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let pool = seatmap_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;
    let store = Arc::new(SqliteStore::new(pool));
    let ids = UuidTableIds;

    match args.command {
        Command::EventLoad { file } => {
            let mut event: Event = serde_json::from_str(&read_text(&file)?)
                .with_context(|| format!("Invalid event document {}", file.display()))?;
            event.touch();
            store.save_event(&event).await?;
            print_json(&serde_json::json!({ "eventId": event.id }))?;
        }

        Command::Preview {
            event_id,
            csv,
            mapping,
        } => {
            let rows = parse_rows(&read_text(&csv)?)?;
            let mapping = parse_mapping(mapping.as_deref())?;
            let report = preview_import_for(store.as_ref(), &event_id, &rows.rows, &mapping).await?;
            print_json(&report)?;
        }

        Command::Apply {
            event_id,
            csv,
            mapping,
            create_missing_tables,
        } => {
            let rows = parse_rows(&read_text(&csv)?)?;
            let mapping = parse_mapping(mapping.as_deref())?;
            let create = create_missing_tables || toml_config.import.create_missing_tables;

            let mut event = load_event(store.as_ref(), &event_id).await?;
            let report = apply_import(
                store.as_ref(),
                &mut event,
                &rows.rows,
                &mapping,
                create,
                &ids,
            )
            .await?;
            print_json(&report)?;
        }

        Command::Submit {
            event_id,
            csv,
            mapping,
            create_missing_tables,
            wait,
        } => {
            let csv_text = read_text(&csv)?;
            let mapping = parse_mapping(mapping.as_deref())?;

            let (queue, worker) = ImportQueue::start(
                store.clone(),
                store.clone(),
                Arc::new(UuidTableIds),
                ImportSettings::from(&toml_config.import),
            );

            let job_id = queue
                .submit(ImportRequest {
                    event_id,
                    csv_text,
                    mapping,
                    create_missing_tables: create_missing_tables
                        || toml_config.import.create_missing_tables,
                })
                .await?;

            if wait {
                loop {
                    let view = queue.status(job_id).await?;
                    if view.status.is_terminal() {
                        print_json(&view)?;
                        break;
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            } else {
                print_json(&serde_json::json!({ "jobId": job_id }))?;
            }

            // Let the worker drain the backlog before the process exits
            drop(queue);
            worker.await.context("Import worker panicked")?;
        }

        Command::Job { job_id } => {
            let view = get_job_status(store.as_ref(), job_id).await?;
            print_json(&view)?;
        }

        Command::Recover => {
            let (queue, worker) = ImportQueue::start(
                store.clone(),
                store.clone(),
                Arc::new(UuidTableIds),
                ImportSettings::from(&toml_config.import),
            );
            let report = recover_jobs(store.as_ref(), &queue).await?;

            drop(queue);
            worker.await.context("Import worker panicked")?;
            print_json(&serde_json::json!({
                "failed": report.failed,
                "requeued": report.requeued,
            }))?;
        }

        Command::Stats => {
            print_json(&event_stats(store.as_ref()).await?)?;
        }
    }

    Ok(())
}
