//! File logging for the terminal game.
//!
//! Stdout is the game screen while the terminal is in raw mode, so log
//! records go to a file through log4rs.

use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Handle,
};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}";

/// Build the log4rs configuration for a file logger at `level`
pub fn file_config(level: LevelFilter, file_path: &Path) -> Result<Config> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(file_path)
        .with_context(|| format!("cannot open log file {}", file_path.display()))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .context("invalid log configuration")?;
    Ok(config)
}

/// Install the global file logger
pub fn init_log(level: LevelFilter, file_path: &Path) -> Result<Handle> {
    let handle = log4rs::init_config(file_config(level, file_path)?)
        .context("a logger is already installed")?;
    Ok(handle)
}
