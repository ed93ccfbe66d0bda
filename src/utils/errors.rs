//! Error types and terminal error display

use colored::Colorize;
use thiserror::Error;

/// Failures raised by secret commands and the registry
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("too many arguments, create takes at most 1 argument")]
    TooManyArguments,

    #[error("provide one or more secret names or use --all")]
    InspectSelection,

    #[error("choose either one or more secrets or all")]
    RemoveSelection,

    #[error("filter input must be in the form of filter=value: {0} is invalid")]
    MalformedFilter(String),

    #[error("{0} is an invalid filter")]
    InvalidFilterKey(String),

    #[error("invalid key=value entry {0:?}: key must not be empty")]
    InvalidKeyValue(String),

    #[error("no secret with name {0} found")]
    NotFound(String),

    #[error("secret with name {0} already exists")]
    AlreadyExists(String),

    #[error("secret {name} is being used by the following container(s): {containers}")]
    InUse { name: String, containers: String },

    #[error("invalid secret name {0:?}: names must match [a-zA-Z0-9][a-zA-Z0-9_.-]*")]
    InvalidName(String),
}

/// Terminal error with suggestions for the user
#[derive(Error, Debug)]
#[error("{message}")]
pub struct CliError {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Add a suggestion to the error
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Print the error with suggestions to stderr
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &self.suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }
    }
}

/// Helper to display error and exit
pub fn display_error_and_exit(error: CliError) -> ! {
    error.display();
    std::process::exit(1);
}

/// Turn a command failure into a `CliError`, keeping the full cause chain
pub fn enhance_error(err: anyhow::Error) -> CliError {
    let message = format!("{:#}", err);
    let base = CliError::new(message);

    match err.chain().find_map(|cause| cause.downcast_ref::<SecretError>()) {
        Some(SecretError::InUse { .. }) => {
            base.suggest("Use --force to remove secrets that are still in use")
        }
        Some(SecretError::NotFound(_)) => {
            base.suggest("List existing secrets with: secretctl secret ls")
        }
        Some(SecretError::InvalidFilterKey(_)) | Some(SecretError::MalformedFilter(_)) => base
            .suggest("Valid filters are name, driver, scope, label and opt")
            .suggest("Example: --filter label=env=prod,driver=local"),
        Some(SecretError::InspectSelection) | Some(SecretError::RemoveSelection) => {
            base.suggest("Pass secret names or --all, but not both")
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_suggestions() {
        let err = CliError::new("test")
            .suggest("suggestion 1")
            .suggest("suggestion 2");
        assert_eq!(err.suggestions.len(), 2);
    }

    #[test]
    fn test_enhance_keeps_cause_chain() {
        let err = Err::<(), _>(SecretError::InvalidFilterKey("color".into()))
            .context("invalid filter")
            .unwrap_err();
        let cli = enhance_error(err);
        assert_eq!(cli.message, "invalid filter: color is an invalid filter");
        assert_eq!(cli.suggestions.len(), 2);
    }

    #[test]
    fn test_enhance_in_use_suggests_force() {
        let err = anyhow::Error::new(SecretError::InUse {
            name: "a".into(),
            containers: "c1".into(),
        });
        let cli = enhance_error(err);
        assert!(cli.suggestions[0].contains("--force"));
    }

    #[test]
    fn test_enhance_plain_error_has_no_suggestions() {
        let cli = enhance_error(anyhow::anyhow!("disk full"));
        assert_eq!(cli.message, "disk full");
        assert!(cli.suggestions.is_empty());
    }
}
