//! Render secrets as JSON or through a column template

mod columns;
mod json;
mod template;

pub use columns::{Column, ENTRY_SEPARATOR, SecretRow, flatten};
pub use json::{JsonFormatter, SecretJson};
pub use template::{Template, TemplateError, align_columns};

use crate::secrets::Secret;
use anyhow::{Context, Result};
use std::io::Write;

/// Format value selecting structured output
pub const JSON_FORMAT: &str = "json";

/// Format used by `--quiet`
pub const QUIET_FORMAT: &str = "{{.Name}}";

/// Default `secret ls` format
pub const DEFAULT_LS_FORMAT: &str = "table {{.Driver}}\t{{.Name}}";

/// Apply `--quiet` and turn typed `\t` sequences into tabs
pub fn resolve_format(format: &str, quiet: bool) -> String {
    if quiet {
        return QUIET_FORMAT.to_string();
    }
    format.replace(r"\t", "\t")
}

/// How a secret collection is turned into text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderMode {
    Structured,
    Template(Template),
}

impl RenderMode {
    pub fn select(format: &str) -> Result<Self, TemplateError> {
        if format == JSON_FORMAT {
            Ok(RenderMode::Structured)
        } else {
            Template::parse(format).map(RenderMode::Template)
        }
    }
}

/// Render secrets in the given (already resolved) format.
///
/// Returns `None` when there is nothing to print: an empty collection in
/// template mode. An empty collection in JSON mode is still `[]`.
pub fn render(secrets: &[Secret], format: &str) -> Result<Option<String>> {
    if secrets.is_empty() && format != JSON_FORMAT {
        return Ok(None);
    }

    let mode = RenderMode::select(format).context("unable to create secret output")?;
    let text = match mode {
        RenderMode::Structured => JsonFormatter::format(secrets)?,
        RenderMode::Template(template) => {
            let rows: Vec<SecretRow> = secrets.iter().map(SecretRow::from).collect();
            template.render(&rows)
        }
    };
    Ok(Some(text))
}

/// Render and write to `out`
pub fn write_secrets<W: Write + ?Sized>(out: &mut W, secrets: &[Secret], format: &str) -> Result<()> {
    if let Some(text) = render(secrets, format)? {
        out.write_all(text.as_bytes())
            .context("Failed to write secret output")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn secrets() -> Vec<Secret> {
        vec![
            Secret::new("b-secret", "local").with_label("env", "prod"),
            Secret::new("a-secret", "vault"),
        ]
    }

    #[test]
    fn test_quiet_overrides_format() {
        assert_eq!(resolve_format("{{.Driver}}", true), QUIET_FORMAT);
        assert_eq!(resolve_format(JSON_FORMAT, true), QUIET_FORMAT);
    }

    #[test]
    fn test_literal_tab_sequence_replaced() {
        assert_eq!(
            resolve_format(r"{{.Name}}\t{{.Driver}}", false),
            "{{.Name}}\t{{.Driver}}"
        );
    }

    #[test]
    fn test_quiet_output_is_names_in_order() {
        let out = render(&secrets(), &resolve_format("json", true)).unwrap();
        assert_eq!(out.as_deref(), Some("b-secret\na-secret\n"));
    }

    #[test]
    fn test_empty_template_output_is_nothing() {
        assert_eq!(render(&[], DEFAULT_LS_FORMAT).unwrap(), None);
        // not parsed when there is nothing to render
        assert_eq!(render(&[], "{{.Bogus}}").unwrap(), None);
    }

    #[test]
    fn test_empty_json_is_empty_array() {
        assert_eq!(render(&[], JSON_FORMAT).unwrap().as_deref(), Some("[]\n"));
    }

    #[test]
    fn test_default_ls_table() {
        let out = render(&secrets(), DEFAULT_LS_FORMAT).unwrap().unwrap();
        assert_eq!(
            out,
            "DRIVER   SECRET NAME\n\
             local    b-secret\n\
             vault    a-secret\n"
        );
    }

    #[test]
    fn test_template_error_is_wrapped() {
        let err = render(&secrets(), "{{.Size}}").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "unable to create secret output: template: can't evaluate field Size in secret"
        );
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(RenderMode::select("json").unwrap(), RenderMode::Structured);
        assert!(matches!(
            RenderMode::select("{{.Name}}").unwrap(),
            RenderMode::Template(_)
        ));
    }

    #[test]
    fn test_write_secrets() {
        let mut buf: Vec<u8> = Vec::new();
        write_secrets(&mut buf, &secrets(), "{{.Name}} {{.Labels}}").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "b-secret env=prod\na-secret \n");
    }
}
