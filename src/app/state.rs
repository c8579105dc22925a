//! Client application state.

use crate::client::RemoteClient;
use crate::error::Result;
use crate::store::CredentialStore;
use std::time::Duration;

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print version and operations of the selected or default server
    Check { server: Option<String> },
    Remove(String),
    List,
    SetDefault(String),
    /// Interactive wizard adding or replacing a server
    Add,
}

/// A server the wizard is about to store.
#[derive(Clone)]
pub struct NewServer {
    pub name: String,
    pub address: String,
    pub user: String,
    pub password: String,
    /// Shared RC4 secret; blank means Basic
    pub secret: String,
}

pub struct App {
    pub store: CredentialStore,
    pub timeout: Duration,
}

impl App {
    pub fn new(store: CredentialStore, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Build a client for `server` or the default server.
    ///
    /// The store is read again on every call so edits made by other
    /// processes are picked up.
    pub fn load_client(&self, server: Option<&str>) -> Result<RemoteClient> {
        let profile = self.store.resolve(server)?;
        RemoteClient::with_timeout(&profile, self.timeout)
    }
}
