//! JSON file backed secret registry

use crate::secrets::registry::{Connect, CreateRequest, RemoveReport, SecretRegistry, Selection};
use crate::secrets::secret::{LOCAL_SCOPE, Secret};
use crate::utils::errors::SecretError;
use anyhow::{Context, Result, bail};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("secret name pattern is valid")
});

/// On-disk layout of the state file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub secrets: Vec<Secret>,

    /// Secret name to the containers currently using it
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub consumers: BTreeMap<String, BTreeSet<String>>,
}

/// Opens a [`FileRegistry`] at a fixed path
#[derive(Debug, Clone)]
pub struct FileConnector {
    pub state_file: PathBuf,
    pub default_driver: String,
}

impl FileConnector {
    pub fn new(state_file: impl Into<PathBuf>, default_driver: impl Into<String>) -> Self {
        Self {
            state_file: state_file.into(),
            default_driver: default_driver.into(),
        }
    }
}

impl Connect for FileConnector {
    type Registry = FileRegistry;

    fn connect(&self) -> Result<FileRegistry> {
        FileRegistry::open(&self.state_file, &self.default_driver)
    }
}

/// Registry persisted to a single JSON file.
///
/// An exclusive lock on `<state file>.lock` is held from `open` until
/// `shutdown` or drop, so overlapping invocations run one after another.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    default_driver: String,
    state: StateFile,
    lock: Option<File>,
}

/// Sidecar lock file next to the state file
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Parent directory of the state file, `.` for a bare file name
fn state_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl FileRegistry {
    /// Lock and load the state file; a missing file is an empty registry.
    ///
    /// Blocks while another registry holds the lock on the same path.
    pub fn open(path: &Path, default_driver: &str) -> Result<Self> {
        let dir = state_dir(path);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

        let lock_path = lock_path(path);
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        lock.lock_exclusive()
            .with_context(|| format!("Failed to lock {}", lock_path.display()))?;
        crate::log_debug!("Locked {}", lock_path.display());

        let state = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read state file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse state file: {}", path.display()))?
        } else {
            crate::log_debug!("State file {} not found, starting empty", path.display());
            StateFile::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            default_driver: default_driver.to_string(),
            state,
            lock: Some(lock),
        })
    }

    pub fn state(&self) -> &StateFile {
        &self.state
    }

    /// Record a container as a user of a secret.
    ///
    /// The container engine calls this when it mounts a secret into a
    /// container; secretctl itself never does. Secrets with consumers are
    /// refused by remove unless it is forced.
    pub fn add_consumer(&mut self, secret: &str, container: &str) -> Result<()> {
        self.find(secret)?;
        self.state
            .consumers
            .entry(secret.to_string())
            .or_default()
            .insert(container.to_string());
        self.save()
    }

    fn find(&self, name: &str) -> Result<&Secret, SecretError> {
        self.state
            .secrets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }

    fn generate_name(&self) -> String {
        loop {
            let name = uuid::Uuid::new_v4().simple().to_string();
            if self.find(&name).is_err() {
                return name;
            }
        }
    }

    /// Resolve a selection to names, failing on the first unknown one
    fn resolve(&self, selection: &Selection) -> Result<Vec<String>, SecretError> {
        match selection {
            Selection::All => Ok(self.state.secrets.iter().map(|s| s.name.clone()).collect()),
            Selection::Names(names) => names
                .iter()
                .map(|name| self.find(name).map(|s| s.name.clone()))
                .collect(),
        }
    }

    /// A name already removed earlier in the batch is `NotFound`
    fn remove_one(&mut self, name: &str, force: bool) -> Result<(), SecretError> {
        self.find(name)?;
        if let Some(users) = self.state.consumers.get(name).filter(|u| !u.is_empty()) {
            if !force {
                return Err(SecretError::InUse {
                    name: name.to_string(),
                    containers: users.iter().cloned().collect::<Vec<_>>().join(", "),
                });
            }
            crate::log_warn!("Removing secret {} while it is still in use", name);
        }
        self.state.consumers.remove(name);
        self.state.secrets.retain(|s| s.name != name);
        Ok(())
    }

    /// Write the state through a temp file in the same directory
    fn save(&self) -> Result<()> {
        if self.lock.is_none() {
            bail!("secret registry at {} is closed", self.path.display());
        }
        let dir = state_dir(&self.path);

        let contents =
            serde_json::to_string_pretty(&self.state).context("Failed to serialize state")?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        temp.write_all(contents.as_bytes())
            .context("Failed to write state")?;
        temp.persist(&self.path)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}

impl SecretRegistry for FileRegistry {
    fn secrets(&self) -> Result<Vec<Secret>> {
        Ok(self.state.secrets.clone())
    }

    fn create_secret(&mut self, request: CreateRequest) -> Result<String> {
        let name = if request.name.is_empty() {
            self.generate_name()
        } else {
            if !NAME_PATTERN.is_match(&request.name) {
                return Err(SecretError::InvalidName(request.name).into());
            }
            if self.find(&request.name).is_ok() {
                return Err(SecretError::AlreadyExists(request.name).into());
            }
            request.name
        };

        let driver = if request.driver.is_empty() {
            self.default_driver.clone()
        } else {
            request.driver
        };

        let secret = Secret {
            name: name.clone(),
            labels: request.labels,
            options: request.options,
            driver,
            scope: LOCAL_SCOPE.to_string(),
            ctr_specific: false,
        };

        crate::log_info!("Creating secret {} (driver {})", secret.name, secret.driver);
        self.state.secrets.push(secret);
        self.save()?;

        Ok(name)
    }

    fn remove_secrets(&mut self, selection: &Selection, force: bool) -> RemoveReport {
        let names = match self.resolve(selection) {
            Ok(names) => names,
            Err(e) => return RemoveReport::failed(Vec::new(), e),
        };

        let mut removed = Vec::with_capacity(names.len());
        let mut failure = None;
        for name in names {
            match self.remove_one(&name, force) {
                Ok(()) => removed.push(name),
                Err(e) => {
                    failure = Some(anyhow::Error::new(e));
                    break;
                }
            }
        }

        if !removed.is_empty()
            && let Err(e) = self.save()
        {
            // nothing was persisted, so nothing counts as removed
            return RemoveReport::failed(Vec::new(), e);
        }

        match failure {
            Some(e) => RemoveReport::failed(removed, e),
            None => RemoveReport::ok(removed),
        }
    }

    fn inspect_secrets(&self, selection: &Selection) -> Result<Vec<Secret>> {
        let names = self.resolve(selection)?;
        Ok(names
            .iter()
            .filter_map(|name| self.state.secrets.iter().find(|s| &s.name == name))
            .cloned()
            .collect())
    }

    fn shutdown(&mut self) -> Result<()> {
        crate::log_debug!("Closing secret registry at {}", self.path.display());
        if let Some(lock) = self.lock.take() {
            FileExt::unlock(&lock)
                .with_context(|| format!("Failed to unlock {}", lock_path(&self.path).display()))?;
        }
        Ok(())
    }
}
