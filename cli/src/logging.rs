use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    LogFile(#[from] io::Error),

    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Log to stdout and append to `log_file`, creating its directory.
pub fn init(level: LevelFilter, log_file: &Path) -> Result<(), LoggingError> {
    let file = open_log_file(log_file)?;

    // Only our own crates; the mDNS daemon is chatty at debug level
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .add_filter_allow_str("nemucast")
        .add_filter_allow_str("chromecast")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(level, config.clone(), TerminalMode::Stdout, ColorChoice::Auto),
        WriteLogger::new(level, config, file),
    ])?;

    Ok(())
}

pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Parse a `LOG_LEVEL` value; unknown names fall back to INFO
pub fn parse_level(value: &str) -> LevelFilter {
    match value.trim().to_ascii_uppercase().as_str() {
        "WARNING" => LevelFilter::Warn,
        "CRITICAL" | "FATAL" => LevelFilter::Error,
        other => other.parse().unwrap_or(LevelFilter::Info),
    }
}
