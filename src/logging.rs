use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use crate::app::AppResult;

/// Environment variable that overrides the `--log-level` flag.
pub const LOG_ENV: &str = "HOVA_LOG";

pub fn log_path() -> AppResult<PathBuf> {
    let dirs = ProjectDirs::from("", "", "hova").context("Cannot find a home directory")?;
    let dir = dirs.data_local_dir();
    fs::create_dir_all(dir).context("Could not create data directory")?;
    Ok(dir.join("hova.log"))
}

/// Sends tracing output to the log file. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr.
pub fn init(default_level: &str) -> AppResult<PathBuf> {
    let path = log_path()?;
    let file = File::create(&path).context("Could not create log file")?;
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(format!("hova={default_level}")))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}
