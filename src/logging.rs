use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;

/// Parses a level name, falling back to `INFO` for anything unknown.
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

/// Routes `tracing` events to `path` as JSON lines. The terminal belongs to
/// the dashboard, so nothing is ever written to stdout or stderr.
pub fn init_file_logging(path: &Path, level: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_max_level(parse_level(level))
        .with_thread_names(true)
        .with_writer(move || clone_or_sink(&file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn clone_or_sink(file: &File) -> Box<dyn std::io::Write> {
    match file.try_clone() {
        Ok(clone) => Box::new(clone),
        Err(_) => Box::new(std::io::sink()),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
