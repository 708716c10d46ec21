// ruckstats - league workbook ingestion from the command line

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use exit_codes::*;
use ruckstats_config::{ConfigError, IngestSettings};
use ruckstats_core::{MemoryStore, Store};
use ruckstats_ingest::{upload_report, IngestOptions, IngestReport};
use ruckstats_io::SqliteStore;

#[derive(Parser)]
#[command(name = "ruckstats")]
#[command(about = "Load the league statistics workbook into the stats database")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear the database and rebuild it from the workbook
    #[command(after_help = "\
Examples:
  ruckstats ingest
  ruckstats ingest --workbook exports/2025.xlsx --db data/league.db
  ruckstats ingest --dry-run --json")]
    Ingest {
        /// Workbook to read (default: workbook.path from config, else data/report.xlsx)
        #[arg(long, short = 'w')]
        workbook: Option<PathBuf>,

        /// SQLite database (default: store.path from config, else data/ruckstats.db)
        #[arg(long, env = "RUCKSTATS_DB")]
        db: Option<PathBuf>,

        /// Config file (default: <config dir>/ruckstats/ingest.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Ingest into memory only; the database is not touched
        #[arg(long)]
        dry_run: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ingest an uploaded .xlsx file and print the upload outcome as JSON
    Upload {
        /// The uploaded file
        file: PathBuf,

        /// SQLite database (default: store.path from config, else data/ruckstats.db)
        #[arg(long, env = "RUCKSTATS_DB")]
        db: Option<PathBuf>,

        /// Config file (default: <config dir>/ruckstats/ingest.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Ingest { workbook, db, config, dry_run, json } => {
            cmd_ingest(workbook, db, config, dry_run, json)
        }
        Commands::Upload { file, db, config } => cmd_upload(file, db, config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Io { .. } => Some("pass --config with an existing file, or omit it".to_string()),
            ConfigError::Parse(_) => Some("groups must be \"A\", \"B\" or \"C\"; paths are strings".to_string()),
        };
        Self { code: EXIT_USAGE, message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn load_settings(config: Option<&Path>) -> Result<IngestSettings, CliError> {
    IngestSettings::load(config).map_err(CliError::config)
}

fn open_store(path: &Path) -> Result<SqliteStore, CliError> {
    SqliteStore::open(path).map_err(|e| CliError::failed(format!("{}: {e}", path.display())))
}

// ============================================================================
// ingest
// ============================================================================

fn cmd_ingest(
    workbook: Option<PathBuf>,
    db: Option<PathBuf>,
    config: Option<PathBuf>,
    dry_run: bool,
    json: bool,
) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let options = IngestOptions::from_settings(&settings);
    let workbook = workbook.unwrap_or(settings.workbook.path);

    let report = if dry_run {
        let mut store = MemoryStore::new();
        ingest_into(&workbook, &mut store, &options)?
    } else {
        let db = db.unwrap_or(settings.store.path);
        let mut store = open_store(&db)?;
        ingest_into(&workbook, &mut store, &options)?
    };

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::failed(format!("cannot serialize report: {e}")))?;
        println!("{out}");
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}

fn ingest_into(workbook: &Path, store: &mut dyn Store, options: &IngestOptions) -> Result<IngestReport, CliError> {
    ruckstats_ingest::run(workbook, store, options).map_err(|e| {
        let err = CliError::failed(e.to_string());
        if workbook.exists() {
            err
        } else {
            err.with_hint("pass --workbook or set workbook.path in the config")
        }
    })
}

// ============================================================================
// upload
// ============================================================================

fn cmd_upload(file: PathBuf, db: Option<PathBuf>, config: Option<PathBuf>) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let options = IngestOptions::from_settings(&settings);

    let bytes = std::fs::read(&file)
        .map_err(|e| CliError::usage(format!("cannot read {}: {e}", file.display())))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut store = open_store(&db.unwrap_or(settings.store.path))?;
    let outcome = upload_report(&file_name, &bytes, &mut store, &options);

    let out = serde_json::to_string_pretty(&outcome)
        .map_err(|e| CliError::failed(format!("cannot serialize outcome: {e}")))?;
    println!("{out}");

    if outcome.success {
        Ok(())
    } else {
        // The outcome already carries the message
        Err(CliError::failed(String::new()))
    }
}
