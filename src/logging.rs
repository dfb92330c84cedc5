use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::prelude::*;

const LOG_FILE_NAME: &str = "fwcheck.log";

/// Log file used when none is configured: system-wide for root, the
/// user's Library/Logs otherwise.
pub fn default_log_path(is_root: bool, home: Option<PathBuf>) -> PathBuf {
    if is_root {
        return PathBuf::from("/var/log").join(LOG_FILE_NAME);
    }
    match home {
        Some(home) => home.join("Library").join("Logs").join(LOG_FILE_NAME),
        None => std::env::temp_dir().join(LOG_FILE_NAME),
    }
}

/// Effective log file path for `config`.
pub fn log_path(config: &LoggingConfig) -> PathBuf {
    config.path.clone().unwrap_or_else(|| {
        default_log_path(nix::unistd::geteuid().is_root(), dirs::home_dir())
    })
}

/// Open `path` for appending, creating it and its directory if needed.
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Log {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Log {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Install the global subscriber. Warnings and errors go to stderr (every
/// level with `verbose`); the log file, when enabled, records INFO and up
/// (DEBUG with `verbose`). `RUST_LOG` overrides the console level.
pub fn init(config: &LoggingConfig) {
    let (console_level, file_level) = if config.verbose {
        (LevelFilter::DEBUG, LevelFilter::DEBUG)
    } else {
        (LevelFilter::WARN, LevelFilter::INFO)
    };

    let console = Layer::default()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(console_level.into())
                .from_env_lossy(),
        );

    let mut file_error = None;
    let file = if config.enabled {
        let path = log_path(config);
        match open_log_file(&path) {
            Ok(file) => Some(
                Layer::default()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(file_level),
            ),
            Err(e) => {
                file_error = Some(e);
                None
            }
        }
    } else {
        None
    };

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!("file logging disabled: {}", e);
    }
}
