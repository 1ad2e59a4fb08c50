use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Log, LogLevel};

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// Where console output goes. `Stderr` keeps stdout free for machine readable output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleStream {
    /// Below warn on stdout, warn and above on stderr.
    Split,
    Stderr,
}

fn add_console_sinks(builder: &mut LoggerBuilder, console: ConsoleStream) -> spdlog::Result<()> {
    if console == ConsoleStream::Stderr {
        let stderr = Arc::new(StdStreamSink::builder()
            .std_stream(StdStream::Stderr)
            .build()?);
        builder.sink(stderr);
        return Ok(());
    }

    let stdout = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(Level::Warn))
        .build()?);

    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
        .build()?);

    builder.sink(stdout).sink(stderr);

    Ok(())
}

/// Builds the logger for a `[log]` section. Without one, only console sinks are used.
pub fn create_logger(log: Option<&Log>, verbose: bool, console: ConsoleStream) -> spdlog::Result<Arc<Logger>> {
    let mut builder = Logger::builder();
    if let Some(location) = log.and_then(|log| log.location.as_ref()) {
        let daily_sink = Arc::new(RotatingFileSink::builder()
            .base_path(location)
            .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
            .max_files(30)
            .rotate_on_open(false)
            .build()?);
        builder.sink(daily_sink);
    }

    let to_console = log.map_or(true, |log| log.log_to_console || log.location.is_none());
    if to_console {
        add_console_sinks(&mut builder, console)?;
    }

    let level = match (verbose, log) {
        (true, _) => Level::Debug,
        (false, Some(log)) => log.level.into(),
        (false, None) => Level::Info,
    };
    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(level));

    Ok(logger)
}

pub fn configure_logger(log: Option<&Log>, verbose: bool, console: ConsoleStream) -> spdlog::Result<()> {
    let logger = create_logger(log, verbose, console)?;
    spdlog::set_default_logger(logger);
    Ok(())
}
