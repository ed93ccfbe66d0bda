//! Secret metadata record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Driver applied when a secret is created without one
pub const DEFAULT_DRIVER: &str = "local";

/// Scope assigned by the registry to every secret it creates
pub const LOCAL_SCOPE: &str = "local";

/// A named secret as stored by the registry.
///
/// The name is fixed at creation. Labels and options are plain string maps;
/// they are kept sorted so every rendering of the same secret is identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub options: BTreeMap<String, String>,

    pub driver: String,

    pub scope: String,

    /// Created implicitly for a single container and removed along with it
    #[serde(rename = "ctrSpecific", default)]
    pub ctr_specific: bool,
}

impl Secret {
    pub fn new(name: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
            options: BTreeMap::new(),
            driver: driver.into(),
            scope: LOCAL_SCOPE.to_string(),
            ctr_specific: false,
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Where the secret is mounted on the host, derived on every call
    pub fn mount_point(&self) -> String {
        format!("/secrets/{}/{}", self.driver, self.name)
    }
}
