//! Registry collaborator interface and scoped runtime handle

use crate::secrets::Secret;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Which secrets an inspect or remove call applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Names(Vec<String>),
}

/// Parameters for creating a secret
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRequest {
    /// Empty means the registry picks a name
    pub name: String,
    /// Empty means the registry's default driver
    pub driver: String,
    pub labels: BTreeMap<String, String>,
    pub options: BTreeMap<String, String>,
}

/// Outcome of a batch removal.
///
/// `removed` lists what was actually deleted, even when `error` is set.
#[derive(Debug, Default)]
pub struct RemoveReport {
    pub removed: Vec<String>,
    pub error: Option<anyhow::Error>,
}

impl RemoveReport {
    pub fn ok(removed: Vec<String>) -> Self {
        Self {
            removed,
            error: None,
        }
    }

    pub fn failed(removed: Vec<String>, error: impl Into<anyhow::Error>) -> Self {
        Self {
            removed,
            error: Some(error.into()),
        }
    }
}

/// Storage engine that owns the secrets
pub trait SecretRegistry {
    /// Every secret, in registry order
    fn secrets(&self) -> Result<Vec<Secret>>;

    /// Create a secret and return its resolved name
    fn create_secret(&mut self, request: CreateRequest) -> Result<String>;

    /// Remove secrets; secrets still in use are refused unless `force`
    fn remove_secrets(&mut self, selection: &Selection, force: bool) -> RemoveReport;

    /// Look up secrets by name, or all of them
    fn inspect_secrets(&self, selection: &Selection) -> Result<Vec<Secret>>;

    /// Release the registry; called once when the runtime handle drops
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens a registry for one command invocation
pub trait Connect {
    type Registry: SecretRegistry;

    fn connect(&self) -> Result<Self::Registry>;
}

/// Registry handle that shuts the registry down when dropped
pub struct Runtime<R: SecretRegistry> {
    registry: R,
}

impl<R: SecretRegistry> Deref for Runtime<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.registry
    }
}

impl<R: SecretRegistry> DerefMut for Runtime<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.registry
    }
}

impl<R: SecretRegistry> Drop for Runtime<R> {
    fn drop(&mut self) {
        if let Err(e) = self.registry.shutdown() {
            crate::log_warn!("Failed to shut down secret runtime: {:#}", e);
        }
    }
}

/// Acquire the registry for the duration of one command
pub fn get_runtime<C: Connect>(connector: &C) -> Result<Runtime<C::Registry>> {
    let registry = connector
        .connect()
        .context("error creating secret runtime")?;
    crate::log_debug!("Secret runtime acquired");
    Ok(Runtime { registry })
}
