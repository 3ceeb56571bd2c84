//! Logging setup.
//!
//! Logs go to stderr by default. `--log-file` moves them to the platform state
//! directory so stdout and stderr carry only query output.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info";

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// File target at the default log path.
    pub fn default_file() -> Self {
        LogTarget::File(get_log_path())
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber and returns the target actually in use.
///
/// A file target whose file cannot be created degrades to stderr.
pub fn init(target: LogTarget) -> LogTarget {
    let path = match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
            return LogTarget::Stderr;
        }
        LogTarget::File(path) => path,
    };

    match open_log_file(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(file)
                .with_ansi(false)
                .init();
            LogTarget::File(path)
        }
        Err(e) => {
            eprintln!("Warning: Could not open log file {}: {e}", path.display());
            init(LogTarget::Stderr)
        }
    }
}

// Truncated on each run.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Returns the default log file path.
///
/// `~/.local/state/query-launch/query-launch.log` on Linux, the config
/// directory where no state directory exists, then the temp directory.
pub fn get_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("query-launch").join("query-launch.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("query-launch.log"))
}
