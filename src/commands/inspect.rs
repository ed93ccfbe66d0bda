//! `secret inspect`

use anyhow::Result;
use std::io::Write;

use crate::commands::selection;
use crate::output::{resolve_format, write_secrets};
use crate::secrets::{Connect, SecretRegistry, get_runtime};
use crate::utils::errors::SecretError;

/// Options for inspecting secrets
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub names: Vec<String>,
    pub all: bool,
    pub format: String,
}

/// Show details of the named secrets, or all of them
pub fn secret_inspect<C, W>(options: InspectOptions, connector: &C, out: &mut W) -> Result<()>
where
    C: Connect,
    W: Write + ?Sized,
{
    let selection = selection(options.names, options.all, SecretError::InspectSelection)?;

    let runtime = get_runtime(connector)?;
    let secrets = runtime.inspect_secrets(&selection)?;

    write_secrets(out, &secrets, &resolve_format(&options.format, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;

    fn inspect(harness: &Harness, names: &[&str], all: bool, format: &str) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        let options = InspectOptions {
            names: names.iter().map(|s| s.to_string()).collect(),
            all,
            format: format.to_string(),
        };
        secret_inspect(options, &harness.connector, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_inspect_json() {
        let harness = Harness::new();
        harness.create("a", "local", &[("env", "prod")]);
        harness.create("b", "local", &[]);

        let out = inspect(&harness, &["a"], false, "json").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["name"], "a");
        assert_eq!(parsed[0]["mountPoint"], "/secrets/local/a");
    }

    #[test]
    fn test_inspect_all_with_template() {
        let harness = Harness::new();
        harness.create("a", "local", &[]);
        harness.create("b", "vault", &[]);

        let out = inspect(&harness, &[], true, "{{.Driver}} {{.Scope}}").unwrap();
        assert_eq!(out, "local local\nvault local\n");
    }

    #[test]
    fn test_inspect_all_empty_registry() {
        let harness = Harness::new();
        assert_eq!(inspect(&harness, &[], true, "json").unwrap(), "[]\n");
    }

    #[test]
    fn test_inspect_not_found() {
        let harness = Harness::new();
        harness.create("a", "local", &[]);
        let err = inspect(&harness, &["a", "missing"], false, "json").unwrap_err();
        assert_eq!(err.to_string(), "no secret with name missing found");
    }

    #[test]
    fn test_selection_rules() {
        let harness = Harness::broken();
        for (names, all) in [(vec!["a"], true), (vec![], false)] {
            let err = inspect(&harness, &names, all, "json").unwrap_err();
            assert_eq!(err.to_string(), "provide one or more secret names or use --all");
        }
    }
}
