use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
};

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, DEFAULT_LOG_FILTER};

/// Installs the global subscriber when a log file is configured.
///
/// The terminal belongs to the editor while it runs, so diagnostics only
/// ever go to a file. Returns whether a subscriber was installed.
pub fn init(config: &Config) -> io::Result<bool> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(false);
    };
    let writer = open_log(path)?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}

fn open_log(path: &Path) -> io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}
