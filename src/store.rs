//! Persisted list of remote servers the client can talk to.
//!
//! The list is read from disk on every use and each mutation runs
//! lock, load, mutate, save before returning. Saves go through a temporary
//! file renamed over the target, so readers never observe a partial write.
//! Mutations on the same path are serialized across every store instance in
//! this process; separate processes writing the same file race and the last
//! writer wins.

use crate::config;
use crate::error::{Result, RockerError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// One named remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Absolute base URL ending in exactly one `/`
    pub address: String,
    /// Authorization header value sent verbatim with every request
    pub auth: String,
}

impl Profile {
    /// Scheme token of the stored header, e.g. `Basic`.
    pub fn auth_mechanism(&self) -> &str {
        self.auth.split_whitespace().next().unwrap_or_default()
    }
}

/// A profile as returned by [`CredentialStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub profile: Profile,
    pub is_default: bool,
}

/// On-disk representation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ServerList {
    #[serde(default)]
    profiles: Vec<Profile>,
    #[serde(default)]
    default: Option<String>,
}

impl ServerList {
    fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    fn default_profile(&self) -> Option<&Profile> {
        self.default.as_deref().and_then(|name| self.get(name))
    }
}

/// Validate an address and normalize it to end with a single `/`.
pub fn normalize_address(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let normalized = format!("{}/", trimmed);
    let url = Url::parse(&normalized)
        .map_err(|e| RockerError::Config(format!("invalid server address '{}': {}", raw, e)))?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(RockerError::Config(format!(
            "server address '{}' must be an absolute URL",
            raw
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(RockerError::Config(format!(
            "server address '{}' must not carry a query or fragment",
            raw
        )));
    }
    Ok(normalized)
}

/// One mutation lock per store file, shared by all instances in the process.
static PATH_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(Default::default);

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = PATH_LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(locks.entry(key).or_default())
}

/// File backed registry of [`Profile`]s with an optional default.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock = lock_for(&path);
        Self { path, lock }
    }

    /// Open the store at `<home>/.rocker-servers`.
    pub fn open_default() -> Result<Self> {
        config::default_store_path()
            .map(Self::new)
            .ok_or_else(|| RockerError::Config("could not determine home directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a profile, replacing any profile with the same name.
    ///
    /// The first profile added to an empty store becomes the default.
    pub fn add(&self, name: &str, address: &str, auth: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RockerError::Config("server name must not be empty".to_string()));
        }
        let profile = Profile {
            name: name.to_string(),
            address: normalize_address(address)?,
            auth: auth.to_string(),
        };

        let _guard = self.acquire();
        let mut list = self.read();
        let was_empty = list.profiles.is_empty();

        match list.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => list.profiles.push(profile),
        }
        if was_empty {
            list.default = Some(name.to_string());
        }

        self.write(&list)?;
        info!("Stored server {}", name);
        Ok(())
    }

    /// Remove a profile. Removing an unknown name is not an error.
    ///
    /// Returns whether a profile was removed.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        let _guard = self.acquire();
        let mut list = self.read();

        let before = list.profiles.len();
        list.profiles.retain(|p| p.name != name);
        if list.profiles.len() == before {
            debug!("Server {} not stored, nothing to remove", name);
            return Ok(false);
        }
        if list.default.as_deref() == Some(name) {
            list.default = None;
        }

        self.write(&list)?;
        info!("Removed server {}", name);
        Ok(true)
    }

    /// Mark an existing profile as the default.
    pub fn set_default(&self, name: &str) -> Result<()> {
        let name = name.trim();
        let _guard = self.acquire();
        let mut list = self.read();

        if list.get(name).is_none() {
            return Err(RockerError::UnknownProfile(name.to_string()));
        }
        list.default = Some(name.to_string());

        self.write(&list)?;
        info!("Server {} set as default", name);
        Ok(())
    }

    /// Look up `name`, or the default profile when no name is given.
    pub fn resolve(&self, name: Option<&str>) -> Result<Profile> {
        let list = self.read();
        match name.map(str::trim) {
            Some(name) => list
                .get(name)
                .cloned()
                .ok_or_else(|| RockerError::UnknownProfile(name.to_string())),
            None => list
                .default_profile()
                .cloned()
                .ok_or(RockerError::NoDefaultSet),
        }
    }

    /// All profiles in insertion order.
    pub fn list(&self) -> Vec<ProfileEntry> {
        let list = self.read();
        let default = list.default_profile().map(|p| p.name.clone());
        list.profiles
            .into_iter()
            .map(|profile| ProfileEntry {
                is_default: default.as_deref() == Some(profile.name.as_str()),
                profile,
            })
            .collect()
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Missing, unreadable and corrupt files all read as an empty list.
    fn read(&self) -> ServerList {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ServerList::default(),
            Err(e) => {
                warn!("Could not read {}: {}", self.path.display(), e);
                return ServerList::default();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Ignoring corrupt server list {}: {}", self.path.display(), e);
            ServerList::default()
        })
    }

    fn write(&self, list: &ServerList) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(list)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&dir).map_err(RockerError::StoreIo)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(RockerError::StoreIo)?;
        tmp.write_all(&bytes).map_err(RockerError::StoreIo)?;
        tmp.as_file().sync_all().map_err(RockerError::StoreIo)?;
        tmp.persist(&self.path)
            .map_err(|e| RockerError::StoreIo(e.error))?;

        debug!("Saved {} servers to {}", list.profiles.len(), self.path.display());
        Ok(())
    }
}
