//! Structured (JSON) secret output

use crate::secrets::Secret;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;

/// Full-fidelity view of a secret, including the derived mount point
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretJson<'a> {
    pub name: &'a str,
    pub labels: &'a BTreeMap<String, String>,
    pub mount_point: String,
    pub driver: &'a str,
    pub options: &'a BTreeMap<String, String>,
    pub scope: &'a str,
}

impl<'a> From<&'a Secret> for SecretJson<'a> {
    fn from(secret: &'a Secret) -> Self {
        Self {
            name: &secret.name,
            labels: &secret.labels,
            mount_point: secret.mount_point(),
            driver: &secret.driver,
            options: &secret.options,
            scope: &secret.scope,
        }
    }
}

pub struct JsonFormatter;

impl JsonFormatter {
    /// Pretty JSON array with 4-space indentation; `[]` when empty
    pub fn format(secrets: &[Secret]) -> Result<String> {
        let params: Vec<SecretJson<'_>> = secrets.iter().map(SecretJson::from).collect();

        let mut buf: Vec<u8> = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        params
            .serialize(&mut ser)
            .context("Failed to serialize secrets")?;

        let mut out = String::from_utf8(buf).context("Serialized JSON is not UTF-8")?;
        out.push('\n');
        Ok(out)
    }
}
