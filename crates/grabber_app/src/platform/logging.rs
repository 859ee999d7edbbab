//! Logger setup for the grabber binary.
//!
//! The terminal belongs to the UI, so records only ever go to `./grabber.log`.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

pub(crate) const LOG_FILENAME: &str = "grabber.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogDestination {
    /// Truncate and write `./grabber.log`.
    File,
    Off,
}

impl LogDestination {
    pub fn from_flag(log_to_file: bool) -> Self {
        if log_to_file {
            LogDestination::File
        } else {
            LogDestination::Off
        }
    }
}

/// Installs the global logger. Failing to create the file is reported on
/// stderr and leaves logging disabled.
pub(crate) fn initialize(destination: LogDestination, level: LevelFilter) {
    if destination == LogDestination::Off || level == LevelFilter::Off {
        return;
    }
    if let Some(file) = create_log_file(Path::new(LOG_FILENAME)) {
        let _ = WriteLogger::init(level, build_config(), file);
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_log_file(path: &Path) -> Option<File> {
    match File::create(path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("Warning: could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
