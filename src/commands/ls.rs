//! `secret ls`

use anyhow::{Context, Result};
use std::io::Write;

use crate::output::{resolve_format, write_secrets};
use crate::secrets::{Connect, SecretFilter, SecretRegistry, get_runtime};
use crate::utils::errors::SecretError;

/// Options for listing secrets
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    /// Filter flag values, each holding comma-separated clauses
    pub filters: Vec<String>,
    pub format: String,
    pub quiet: bool,
}

/// List secrets matching every filter clause
pub fn secret_ls<C, W>(options: LsOptions, connector: &C, out: &mut W) -> Result<()>
where
    C: Connect,
    W: Write + ?Sized,
{
    let format = resolve_format(&options.format, options.quiet);
    let filter = SecretFilter::parse(&options.filters).map_err(|e| match e {
        SecretError::InvalidFilterKey(_) => anyhow::Error::new(e).context("invalid filter"),
        other => other.into(),
    })?;

    let runtime = get_runtime(connector)?;
    let secrets = runtime.secrets()?;
    let total = secrets.len();

    let filtered = filter.apply(secrets);
    crate::log_debug!("{} of {} secrets match the filter", filtered.len(), total);

    write_secrets(out, &filtered, &format)
}
