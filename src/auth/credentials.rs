//! Credential types and structures for authentication.

use super::header::AuthHeaderValue;
use super::scheme::AuthScheme;
use crate::error::{Result, RockerError};

/// An `identity:secret` pair as entered by an operator or recovered from a
/// header payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account identifier, usually an e-mail address
    pub identity: String,
    /// Password for the account
    pub secret: String,
}

impl Credentials {
    pub fn new(identity: String, secret: String) -> Self {
        Self { identity, secret }
    }

    /// Join into the `identity:secret` form both schemes encode.
    pub fn to_pair(&self) -> String {
        format!("{}:{}", self.identity, self.secret)
    }

    /// Split decoded bytes on the first `:`.
    pub fn from_pair(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|_| RockerError::AuthFailed("credentials are not valid UTF-8".to_string()))?;
        let (identity, secret) = text
            .split_once(':')
            .ok_or_else(|| RockerError::AuthFailed("credentials lack a ':' separator".to_string()))?;
        Ok(Self::new(identity.to_string(), secret.to_string()))
    }

    /// Build the header value a client should store for these credentials.
    ///
    /// A non-blank `shared_secret` selects RC4 keyed by it, otherwise Basic.
    pub fn auth_header(&self, shared_secret: Option<&str>) -> Result<AuthHeaderValue> {
        match shared_secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(key) => {
                let payload = AuthScheme::Rc4.encode(self, Some(key.as_bytes()))?;
                Ok(AuthHeaderValue::new(AuthScheme::Rc4, payload))
            }
            None => {
                let payload = AuthScheme::Basic.encode(self, None)?;
                Ok(AuthHeaderValue::new(AuthScheme::Basic, payload))
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}
