//! File logging, enabled with `--verbose`.
use anyhow::Context;
use chattest_core::config::LogConfig;
use std::fs;
use std::io::{self, LineWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt::time::OffsetTime};

/// Route tracing output to the file named by `config`.
///
/// `RUST_LOG` takes precedence over the configured filter. Returns the path
/// being written so it can be shown to the user.
pub fn setup_logging(config: &LogConfig) -> anyhow::Result<PathBuf> {
    let log_path = config.log_path();
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)
            .context(format!("Failed to create log directory {}", dir.display()))?;
    }
    rotate_log(&log_path, config.max_size_bytes()).context("Failed to rotate log file")?;

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context(format!("Failed to open {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(LineWriter::new(log_file)))
        .with_ansi(false)
        .with_timer(OffsetTime::local_rfc_3339()?)
        .init();

    tracing::info!(path = %log_path.display(), "Logging started");
    Ok(log_path)
}

/// Move `path` to `<path>.old` when it has grown past `max_bytes`.
fn rotate_log(path: &Path, max_bytes: u64) -> io::Result<bool> {
    let len = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if len <= max_bytes {
        return Ok(false);
    }

    let mut backup = path.as_os_str().to_owned();
    backup.push(".old");
    let backup = PathBuf::from(backup);
    if backup.exists() {
        fs::remove_file(&backup)?;
    }
    fs::rename(path, &backup)?;
    Ok(true)
}
