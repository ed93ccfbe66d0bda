//! Logging utilities using the tracing framework

use std::fmt::Display;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => "warn",  // Default: only warnings and errors
        1 => "info",  // -v: info level
        2 => "debug", // -vv: debug level
        _ => "trace", // -vvv: trace level
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be set when running under tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log an informational message (wrapper around tracing::info)
pub fn log_info<T: Display>(msg: T) {
    tracing::info!("{}", msg);
}

/// Log a warning message (wrapper around tracing::warn)
pub fn log_warn<T: Display>(msg: T) {
    tracing::warn!("{}", msg);
}

/// Log a debug message (wrapper around tracing::debug)
pub fn log_debug<T: Display>(msg: T) {
    tracing::debug!("{}", msg);
}

/// Macro for convenient info logging
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_info(format!($($arg)*))
    };
}

/// Macro for convenient warning logging
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_warn(format!($($arg)*))
    };
}

/// Macro for convenient debug logging
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::utils::logger::log_debug(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0);
        init(3);
    }

    #[test]
    fn test_log_functions() {
        log_info("Test info message");
        log_warn("Test warning message");
        log_debug("Test debug message");
    }
}
