//! Logging setup for camconsole.
//!
//! With `serve --stdio`, stdout carries the console protocol, so logs always
//! go to stderr or to a file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// `RUST_LOG` if set, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber for `target`.
///
/// A log file that cannot be created is reported on stderr, and logging
/// falls back to stderr.
pub fn init(target: &LogTarget) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    let LogTarget::File(path) = target else {
        builder.with_writer(std::io::stderr).init();
        return;
    };

    match open_log_file(path) {
        Ok(file) => builder.with_writer(file).with_ansi(false).init(),
        Err(e) => {
            eprintln!("Warning: Could not open log file {}: {e}", path.display());
            builder.with_writer(std::io::stderr).init();
        }
    }
}

/// Creates the log file and its parent directory, truncating any old log.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Suggested log file location.
///
/// The XDG state directory on Linux (`~/.local/state/camconsole/camconsole.log`),
/// else the config directory, else the temp directory.
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("camconsole").join("camconsole.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("camconsole.log"))
}
