//! `secret create`

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::secrets::{Connect, CreateRequest, SecretRegistry, get_runtime};
use crate::utils::errors::SecretError;
use crate::utils::labels::{get_all_labels, parse_key_values};

/// Options for creating a secret
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Positional arguments; at most one name
    pub args: Vec<String>,
    pub driver: String,
    pub labels: Vec<String>,
    pub label_files: Vec<PathBuf>,
    pub opts: Vec<String>,
}

/// Create a secret and print its resolved name
pub fn secret_create<C, W>(options: CreateOptions, connector: &C, out: &mut W) -> Result<()>
where
    C: Connect,
    W: Write + ?Sized,
{
    if options.args.len() > 1 {
        return Err(SecretError::TooManyArguments.into());
    }

    let labels =
        get_all_labels(&options.label_files, &options.labels).context("unable to process labels")?;
    let opts = parse_key_values(&options.opts).context("unable to process options")?;

    let mut runtime = get_runtime(connector)?;

    let request = CreateRequest {
        name: options.args.into_iter().next().unwrap_or_default(),
        driver: options.driver,
        labels,
        options: opts,
    };
    let name = runtime.create_secret(request)?;

    writeln!(out, "{}", name)?;
    Ok(())
}
