//! Tracing setup
//!
//! Events go to `<cache_dir>/lexi/logs/lexi.log`, truncated at the start
//! of each session, and warnings also go to stderr. Setup is best-effort:
//! if the log file cannot be created the CLI logs to stderr only.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable that turns on debug logging
pub const DEVEL_ENV: &str = "LEXI_DEVEL";

/// Path of the session log file
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("lexi").join("logs").join("lexi.log"))
}

/// Install the global subscriber; returns the log file in use, if any
pub fn init(verbose: bool) -> Option<PathBuf> {
    let debug = verbose || std::env::var_os(DEVEL_ENV).is_some();
    let default_level = if debug { "debug" } else { "info" };

    let log_file = log_file_path().and_then(|path| {
        let dir = path.parent()?;
        std::fs::create_dir_all(dir).ok()?;
        let file = File::create(&path).ok()?;
        Some((path, file))
    });

    let (path, file_layer) = match log_file {
        Some((path, file)) => {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter);
            (Some(path), Some(layer))
        }
        None => (None, None),
    };

    let stderr_level = match (debug, path.is_some()) {
        (true, _) => LevelFilter::DEBUG,
        (false, true) => LevelFilter::WARN,
        (false, false) => LevelFilter::INFO,
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_level);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            target: "lexi::cli",
            version = env!("CARGO_PKG_VERSION"),
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            log = ?path,
            "Session started"
        );
    }
    path
}
