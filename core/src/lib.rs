//! Shared building blocks for the rowbench suites: record types, default
//! constants and logger setup.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use std::path::Path;

pub mod constants;
pub mod types;

const LOGGING_PATTERN: &str = "{d} {l} {f}:{L} - {m}\n";

/// Install the global logger.
///
/// Console output goes to stderr so that reports printed on stdout stay
/// machine-readable. If `file_path` is given every record at `log_level`
/// or above is also appended to that file.
pub fn initialize_logger(log_level: LevelFilter, file_path: Option<&Path>) -> Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
        .build();

    let mut config_builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(log_level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = file_path {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
            .build(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        config_builder =
            config_builder.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    let config = config_builder
        .build(root.build(log_level))
        .context("invalid logger configuration")?;

    log4rs::init_config(config).context("logger already initialized")?;

    Ok(())
}
