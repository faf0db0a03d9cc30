use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_DOCUMENT: &str = "outline.json";
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const LOG_FILTER_ENV: &str = "OUTLINE_LOG";

pub const USAGE: &str = "\
Usage: outline [OPTIONS] [FILE]

Edits the outline stored in FILE (default: outline.json).

Options:
  --log <PATH>     append diagnostics to PATH (filter via OUTLINE_LOG)
  --width <COLS>   wrap blocks at a fixed width instead of the terminal width
  -h, --help       print this help";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub document_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub log_filter: String,
    pub wrap_width: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENT),
            log_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            wrap_width: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Run(Config),
    Help,
}

impl Config {
    pub fn from_env() -> Result<Invocation, ConfigError> {
        Self::parse(env::args().skip(1), env::var(LOG_FILTER_ENV).ok())
    }

    pub fn parse<I>(args: I, log_filter: Option<String>) -> Result<Invocation, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        if let Some(filter) = log_filter.filter(|filter| !filter.trim().is_empty()) {
            config.log_filter = filter;
        }

        let mut document = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "--log" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    config.log_path = Some(PathBuf::from(value));
                }
                "--width" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
                    let width = value
                        .parse::<usize>()
                        .ok()
                        .filter(|width| *width > 0)
                        .ok_or(ConfigError::InvalidWidth(value))?;
                    config.wrap_width = Some(width);
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(ConfigError::UnknownOption(arg.clone()));
                }
                _ if document.is_none() => document = Some(PathBuf::from(&arg)),
                _ => return Err(ConfigError::UnexpectedArgument(arg.clone())),
            }
        }
        if let Some(path) = document {
            config.document_path = path;
        }
        Ok(Invocation::Run(config))
    }
}

/// Wrap width and left padding for a terminal `width` columns wide. Narrow
/// terminals use nearly all columns; wide ones get a centered column of at
/// most 100 characters. A fixed width from the command line wins when it
/// fits.
pub fn wrap_configuration(width: usize, fixed: Option<usize>) -> (usize, usize) {
    if width == 0 {
        return (1, 0);
    }
    if let Some(fixed) = fixed {
        let wrap_width = fixed.min(width.saturating_sub(1)).max(1);
        return (wrap_width, 0);
    }
    if width < 60 {
        let wrap_width = width.saturating_sub(1).max(1);
        return (wrap_width, 0);
    }
    if width < 100 {
        let padding = 2.min(width / 2);
        let wrap_width = width.saturating_sub(padding.saturating_mul(2)).max(1);
        return (wrap_width, padding);
    }
    let mut left_padding = width.saturating_sub(100) / 2 + 4;
    let max_padding = width.saturating_sub(1) / 2;
    if left_padding > max_padding {
        left_padding = max_padding;
    }
    let wrap_width = width.saturating_sub(left_padding.saturating_mul(2)).max(1);
    (wrap_width, left_padding)
}
