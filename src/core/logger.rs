// Buff163 Price Bot - Systemd-Style Logger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Systemd-style logging compatible with journald
//!
//! Terminal output carries a timestamp and a colored level tag; journald
//! output emits `KEY=value` records with the syslog priority.

use std::sync::OnceLock;
use std::time::{ SystemTime, UNIX_EPOCH };

/// Log levels following syslog priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl LogLevel {
    pub fn priority(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warning => "WARNING",
            LogLevel::Notice => "NOTICE",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn color_code(self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m",
            LogLevel::Warning => "\x1b[33m",
            LogLevel::Notice => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Debug => "\x1b[37m",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub use_colors: bool,
    pub include_timestamp: bool,
    pub include_target: bool,
    pub journald_format: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            use_colors: atty::is(atty::Stream::Stderr),
            include_timestamp: true,
            include_target: false,
            journald_format: false,
        }
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Install the global logger; only the first call succeeds
    pub fn init(config: LoggerConfig) -> Result<(), LoggerError> {
        LOGGER.set(Self::new(config)).map_err(|_| LoggerError::AlreadyInitialized)
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.min_level
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.should_log(level) {
            return;
        }

        let timestamp = if self.config.include_timestamp {
            Some(SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs())
        } else {
            None
        };

        eprintln!("{}", self.format(level, target, message, timestamp));
    }

    fn format(&self, level: LogLevel, target: &str, message: &str, timestamp: Option<u64>) -> String {
        if self.config.journald_format {
            self.format_journald(level, target, message, timestamp)
        } else {
            self.format_terminal(level, target, message, timestamp)
        }
    }

    fn format_journald(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        timestamp: Option<u64>
    ) -> String {
        let mut output = format!("PRIORITY={}\nMESSAGE={}\n", level.priority(), message);

        if self.config.include_target && !target.is_empty() {
            output.push_str(&format!("CODE_FILE={}\n", target));
        }
        if let Some(ts) = timestamp {
            output.push_str(&format!("_SOURCE_REALTIME_TIMESTAMP={}\n", ts * 1_000_000));
        }
        output.push_str("SYSLOG_IDENTIFIER=buff-price-bot\n");

        output
    }

    fn format_terminal(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        timestamp: Option<u64>
    ) -> String {
        let mut output = String::new();

        if let Some(ts) = timestamp {
            let datetime = chrono::DateTime
                ::from_timestamp(ts as i64, 0)
                .unwrap_or_default()
                .format("%Y-%m-%d %H:%M:%S");
            output.push_str(&format!("{} ", datetime));
        }

        // Status lines ("[   OK   ] ...") already carry their own tag
        let is_status_line = message.starts_with("[*]") || message.starts_with("[   ");

        if is_status_line {
            if self.config.use_colors {
                output.push_str(&format!("{}{}\x1b[0m", level.color_code(), message));
            } else {
                output.push_str(message);
            }
        } else if self.config.use_colors {
            output.push_str(&format!("{}[{}]\x1b[0m {}", level.color_code(), level.as_str(), message));
        } else {
            output.push_str(&format!("[{}] {}", level.as_str(), message));
        }

        if self.config.include_target && !target.is_empty() {
            output.push_str(&format!(" ({})", target));
        }

        output
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Error, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Warning, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Info, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Debug, module_path!(), &format!($($arg)*))
    };
}

/// Messages logged before `init` are dropped
pub fn log_with_level(level: LogLevel, target: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(level, target, message);
    }
}

pub fn log_init_start(service_name: &str) {
    log_with_level(LogLevel::Notice, module_path!(), &format!("[*] Starting {}...", service_name));
}

pub fn log_init_ok_with_details(service_name: &str, details: &str) {
    log_with_level(
        LogLevel::Info,
        module_path!(),
        &format!("[   OK   ] Starting {} ({})", service_name, details)
    );
}

pub fn log_init_failed(service_name: &str, error: &str) {
    log_with_level(
        LogLevel::Error,
        module_path!(),
        &format!("[  FAILED ] Starting {} - {}", service_name, error)
    );
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Initialize the logger from CLI flags
pub fn init_from_args(debug: bool, journald: bool) -> Result<(), LoggerError> {
    let config = LoggerConfig {
        min_level: if debug { LogLevel::Debug } else { LogLevel::Info },
        use_colors: atty::is(atty::Stream::Stderr) && !journald,
        include_timestamp: !journald,
        include_target: debug,
        journald_format: journald,
    };

    Logger::init(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config(min_level: LogLevel) -> LoggerConfig {
        LoggerConfig {
            min_level,
            use_colors: false,
            include_timestamp: false,
            include_target: false,
            journald_format: false,
        }
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert_eq!(LogLevel::Notice.priority(), 5);
    }

    #[test]
    fn test_logger_level_filtering() {
        let logger = Logger::new(plain_config(LogLevel::Warning));

        assert!(logger.should_log(LogLevel::Error));
        assert!(logger.should_log(LogLevel::Warning));
        assert!(!logger.should_log(LogLevel::Info));

        let verbose = Logger::new(plain_config(LogLevel::Debug));
        assert!(verbose.should_log(LogLevel::Debug));
    }

    #[test]
    fn test_terminal_format() {
        let logger = Logger::new(plain_config(LogLevel::Info));
        assert_eq!(
            logger.format(LogLevel::Warning, "x", "cookie missing", None),
            "[WARNING] cookie missing"
        );
        assert_eq!(
            logger.format(LogLevel::Info, "x", "[   OK   ] Starting gateway", None),
            "[   OK   ] Starting gateway"
        );
    }

    #[test]
    fn test_journald_format() {
        let logger = Logger::new(LoggerConfig {
            journald_format: true,
            include_target: true,
            ..plain_config(LogLevel::Info)
        });
        let record = logger.format(LogLevel::Error, "buff_price_bot::server", "boom", Some(2));

        assert!(record.starts_with("PRIORITY=3\nMESSAGE=boom\n"));
        assert!(record.contains("CODE_FILE=buff_price_bot::server\n"));
        assert!(record.contains("_SOURCE_REALTIME_TIMESTAMP=2000000\n"));
        assert!(record.ends_with("SYSLOG_IDENTIFIER=buff-price-bot\n"));
    }
}
