//! Utility modules for secretctl

pub mod errors;
pub mod labels;
pub mod logger;

// Re-export commonly used items
pub use errors::{CliError, SecretError, display_error_and_exit, enhance_error};
pub use logger::{log_debug, log_info, log_warn};
