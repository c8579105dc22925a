//! Server side verification of authorization headers.

use super::header::AuthHeaderValue;
use super::identity::{Identity, IdentityProvider};
use super::scheme::AuthScheme;
use crate::config::LOOKUP_TIMEOUT_SECS;
use crate::error::{Result, RockerError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves an authorization header to an [`Identity`].
///
/// Holds no per-request state and is shared across concurrent requests.
#[derive(Clone)]
pub struct AuthManager {
    provider: Arc<dyn IdentityProvider>,
    /// Pre-shared RC4 key; RC4 headers are refused when unset
    rc4_key: Option<Vec<u8>>,
    lookup_timeout: Duration,
}

impl AuthManager {
    /// Create a manager accepting Basic credentials only.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            rc4_key: None,
            lookup_timeout: Duration::from_secs(LOOKUP_TIMEOUT_SECS),
        }
    }

    /// Also accept RC4 credentials encrypted with `key`.
    ///
    /// # Errors
    /// Returns `Config` for an empty key.
    pub fn with_rc4_key(mut self, key: impl Into<Vec<u8>>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(RockerError::Config("RC4 key must not be empty".to_string()));
        }
        self.rc4_key = Some(key);
        Ok(self)
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Whether headers using `scheme` can be verified.
    pub fn accepts(&self, scheme: AuthScheme) -> bool {
        match scheme {
            AuthScheme::Basic => true,
            AuthScheme::Rc4 => self.rc4_key.is_some(),
        }
    }

    /// Decode the header and check the credentials with the provider.
    ///
    /// # Errors
    /// `AuthFailed` for undecodable payloads, disabled schemes and rejected
    /// credentials, `LookupTimeout` when the provider is too slow.
    pub async fn authenticate(&self, header: &AuthHeaderValue) -> Result<Identity> {
        if !self.accepts(header.scheme) {
            warn!("Rejecting {} credentials, scheme not enabled", header.scheme);
            return Err(RockerError::AuthFailed(format!(
                "{} authentication is not enabled",
                header.scheme
            )));
        }

        let credentials = header
            .scheme
            .decode(&header.payload, self.rc4_key.as_deref())?;

        debug!(
            "Verifying {} credentials for {}",
            header.scheme, credentials.identity
        );

        let lookup = self
            .provider
            .authenticate(&credentials.identity, &credentials.secret);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(identity))) => Ok(identity),
            Ok(Ok(None)) => Err(RockerError::AuthFailed(
                "invalid identity or secret".to_string(),
            )),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!("Identity lookup for {} timed out", credentials.identity);
                Err(RockerError::LookupTimeout)
            }
        }
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("rc4_enabled", &self.rc4_key.is_some())
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}
