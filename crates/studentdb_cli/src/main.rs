//! `studentdb` interactive entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Start diagnostic logging, seed the ledger, open the store, run the shell.

mod shell;

use clap::Parser;
use log::{info, warn};
use shell::Shell;
use std::error::Error;
use std::path::PathBuf;
use studentdb_core::{
    default_log_level, init_logging, AccountService, ActivityLog, CredentialStore, StoreConfig,
    StudentStore,
};

const DIAGNOSTICS_DIR_NAME: &str = "diagnostics";

/// File-backed student record manager.
#[derive(Debug, Parser)]
#[command(name = "studentdb", version)]
struct Args {
    /// Directory holding students.csv, users.txt and user_logs/.
    /// Defaults to $STUDENTDB_DATA_DIR, then the current directory.
    #[arg(long)]
    data_dir: Option<String>,

    /// Diagnostic log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for diagnostic log files. Defaults to <data-dir>/diagnostics.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = StoreConfig::from_env();
    if let Some(data_dir) = args.data_dir.as_deref() {
        config = config.with_data_dir(data_dir)?;
    }
    std::fs::create_dir_all(config.data_dir())?;

    let log_dir = absolute(
        args.log_dir
            .unwrap_or_else(|| config.data_dir().join(DIAGNOSTICS_DIR_NAME)),
    )?;
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
        // The shell runs without diagnostics.
        eprintln!("warning: diagnostic logging disabled: {err}");
    }

    let credentials = CredentialStore::new(
        config.ledger_path(),
        ActivityLog::new(config.activity_dir_path()),
    );
    let accounts = AccountService::new(credentials, config.admin_username.clone());
    if accounts.bootstrap(&config.admin_secret)? {
        warn!("event=ledger_bootstrap module=cli status=ok default_admin=true");
    }

    let mut store = StudentStore::open_file(config.records_path())?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        studentdb_core::core_version()
    );

    let stdin = std::io::stdin();
    let mut shell = Shell::new(stdin.lock(), std::io::stdout());
    shell.run(&accounts, &mut store)?;

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn absolute(path: PathBuf) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()?.join(path))
}
