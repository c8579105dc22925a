//! Authenticated callers and the lookup that resolves them.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

/// The authenticated caller of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Checks a claimed identity and secret against stored credentials.
///
/// Implementations may block on a user database; the dispatcher bounds each
/// call with a timeout.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the identity is unknown or the secret does not match.
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Option<Identity>>;
}

/// In-memory provider keeping SHA-256 digests of each secret.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentities {
    users: HashMap<String, (Identity, [u8; 32])>,
}

impl StaticIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity with its secret.
    pub fn with_user(mut self, identity: Identity, secret: &str) -> Self {
        self.users
            .insert(identity.id.clone(), (identity, digest(secret)));
        self
    }
}

fn digest(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

#[async_trait]
impl IdentityProvider for StaticIdentities {
    async fn authenticate(&self, identity: &str, secret: &str) -> Result<Option<Identity>> {
        let Some((user, stored)) = self.users.get(identity) else {
            return Ok(None);
        };

        let given = digest(secret);
        let matches = stored
            .iter()
            .zip(given.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0;

        Ok(matches.then(|| user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticIdentities {
        StaticIdentities::new().with_user(
            Identity::new("admin@example.com").with_attribute("nick", "admin"),
            "hunter2",
        )
    }

    #[tokio::test]
    async fn test_known_user_with_matching_secret() {
        let user = provider()
            .authenticate("admin@example.com", "hunter2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "admin@example.com");
        assert_eq!(user.attributes.get("nick").map(String::as_str), Some("admin"));
    }

    #[tokio::test]
    async fn test_wrong_secret() {
        let user = provider()
            .authenticate("admin@example.com", "hunter3")
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let user = provider().authenticate("nobody", "hunter2").await.unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_identity_serializes_without_empty_attributes() {
        let json = serde_json::to_value(Identity::new("a")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "a" }));
    }
}
