//! `secret rm`

use anyhow::Result;
use std::io::Write;

use crate::commands::selection;
use crate::secrets::{Connect, SecretRegistry, get_runtime};
use crate::utils::errors::SecretError;

/// Options for removing secrets
#[derive(Debug, Clone, Default)]
pub struct RmOptions {
    pub names: Vec<String>,
    pub all: bool,
    pub force: bool,
}

/// Remove secrets, printing each removed name.
///
/// Names removed before a failure are printed before the error is returned.
pub fn secret_rm<C, W>(options: RmOptions, connector: &C, out: &mut W) -> Result<()>
where
    C: Connect,
    W: Write + ?Sized,
{
    let selection = selection(options.names, options.all, SecretError::RemoveSelection)?;

    let mut runtime = get_runtime(connector)?;
    let report = runtime.remove_secrets(&selection, options.force);

    let printed = report
        .removed
        .iter()
        .try_for_each(|name| writeln!(out, "{}", name));

    match (report.error, printed) {
        (Some(err), printed) => {
            if !report.removed.is_empty() {
                crate::log_warn!(
                    "Removed {} secret(s) before the failure",
                    report.removed.len()
                );
            }
            match printed {
                Ok(()) => Err(err),
                Err(io) => Err(err.context(format!("failed to print removed secrets: {}", io))),
            }
        }
        (None, printed) => Ok(printed?),
    }
}
