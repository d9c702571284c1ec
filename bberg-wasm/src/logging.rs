use bberg_config::LoggingConfig;
use log::SetLoggerError;
use serde::{Deserialize, Serialize};

/// Installs the process logger. Does nothing when logging is disabled.
pub fn init_logger(config: &LoggingConfig) -> Result<(), SetLoggerError> {
    if !config.enabled {
        return Ok(());
    }

    let mut logger = simple_logger::SimpleLogger::new();
    if !config.timestamp {
        logger = logger.without_timestamps();
    }
    logger = logger.with_level(config.level.into());
    // RUST_LOG wins over the configured level
    if config.env {
        logger = logger.env();
    }
    logger = logger.with_colors(config.color);
    logger = logger.with_threads(config.threads);
    logger.init()
}

/// Debug logger handed to a worker when it is bootstrapped.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ThreadLogger {
    enabled: bool,
    target: String,
}

impl ThreadLogger {
    pub const DEFAULT_TARGET: &'static str = "bberg::worker";

    pub fn new(enabled: bool, target: impl Into<String>) -> Self {
        Self {
            enabled,
            target: target.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, Self::DEFAULT_TARGET)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Same handle with a per worker target, e.g. `bberg::worker::3`.
    pub fn for_worker(&self, index: usize) -> Self {
        Self::new(self.enabled, format!("{}::{index}", self.target))
    }

    pub fn log(&self, msg: &str) {
        if self.enabled {
            log::debug!(target: &self.target, "{}", msg);
        }
    }
}

pub fn thread_logger(config: &LoggingConfig) -> ThreadLogger {
    ThreadLogger::new(
        config.enabled && config.debug_workers,
        ThreadLogger::DEFAULT_TARGET,
    )
}
