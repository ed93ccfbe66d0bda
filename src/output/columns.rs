//! Displayable secret fields and their column headers

use crate::secrets::Secret;
use std::collections::BTreeMap;

/// Separator between flattened label/option entries
pub const ENTRY_SEPARATOR: &str = ",";

/// A field a template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Labels,
    MountPoint,
    Driver,
    Options,
    Scope,
}

/// Template field name and header for every column, in declaration order
static COLUMNS: [(Column, &str, &str); 6] = [
    (Column::Name, "Name", "SECRET NAME"),
    (Column::Labels, "Labels", "LABELS"),
    (Column::MountPoint, "MountPoint", "MOUNT POINT"),
    (Column::Driver, "Driver", "DRIVER"),
    (Column::Options, "Options", "OPTIONS"),
    (Column::Scope, "Scope", "SCOPE"),
];

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Name,
        Column::Labels,
        Column::MountPoint,
        Column::Driver,
        Column::Options,
        Column::Scope,
    ];

    /// Look up a column by its template field name, e.g. `MountPoint`
    pub fn from_field(field: &str) -> Option<Self> {
        COLUMNS
            .iter()
            .find(|(_, name, _)| *name == field)
            .map(|(column, _, _)| *column)
    }

    pub fn field(self) -> &'static str {
        self.entry().1
    }

    pub fn header(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (Column, &'static str, &'static str) {
        &COLUMNS[self as usize]
    }
}

/// One secret flattened to display strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRow {
    pub name: String,
    pub labels: String,
    pub mount_point: String,
    pub driver: String,
    pub options: String,
    pub scope: String,
}

impl SecretRow {
    pub fn value(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::Labels => &self.labels,
            Column::MountPoint => &self.mount_point,
            Column::Driver => &self.driver,
            Column::Options => &self.options,
            Column::Scope => &self.scope,
        }
    }
}

impl From<&Secret> for SecretRow {
    fn from(secret: &Secret) -> Self {
        Self {
            name: secret.name.clone(),
            labels: flatten(&secret.labels),
            mount_point: secret.mount_point(),
            driver: secret.driver.clone(),
            options: flatten(&secret.options),
            scope: secret.scope.clone(),
        }
    }
}

/// `a=1,b,c=3` in key order; a key with an empty value is shown bare
pub fn flatten(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| {
            if v.is_empty() {
                k.clone()
            } else {
                format!("{}={}", k, v)
            }
        })
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}
