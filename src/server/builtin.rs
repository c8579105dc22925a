//! Operations every server exposes.

use super::operation::{Operation, OperationResponse, ServerContext};
use crate::auth::Identity;
use crate::error::{Result, RockerError};
use async_trait::async_trait;
use axum::http::Method;
use serde_json::json;

static GET_ONLY: [Method; 1] = [Method::GET];

/// Returns the user that authenticated the request.
#[derive(Debug, Default)]
pub struct Me;

#[async_trait]
impl Operation for Me {
    fn name(&self) -> &str {
        "Me"
    }

    fn allowed_methods(&self) -> &[Method] {
        &GET_ONLY
    }

    fn requires_auth(&self) -> bool {
        true
    }

    async fn exec(
        &self,
        identity: Option<&Identity>,
        _server: &ServerContext,
    ) -> Result<OperationResponse> {
        let identity = identity.ok_or(RockerError::AuthRequired)?;
        Ok(OperationResponse::ok(serde_json::to_value(identity)?))
    }
}

#[derive(Debug, Default)]
pub struct Version;

#[async_trait]
impl Operation for Version {
    fn name(&self) -> &str {
        "Version"
    }

    fn allowed_methods(&self) -> &[Method] {
        &GET_ONLY
    }

    fn requires_auth(&self) -> bool {
        false
    }

    async fn exec(
        &self,
        _identity: Option<&Identity>,
        server: &ServerContext,
    ) -> Result<OperationResponse> {
        Ok(OperationResponse::ok(json!({ "version": server.version })))
    }
}

/// Lists registered operations with their methods and paths.
#[derive(Debug, Default)]
pub struct Operations;

#[async_trait]
impl Operation for Operations {
    fn name(&self) -> &str {
        "Operations"
    }

    fn allowed_methods(&self) -> &[Method] {
        &GET_ONLY
    }

    fn requires_auth(&self) -> bool {
        false
    }

    async fn exec(
        &self,
        _identity: Option<&Identity>,
        server: &ServerContext,
    ) -> Result<OperationResponse> {
        Ok(OperationResponse::ok(serde_json::to_value(&server.operations)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{OperationDescriptor, OperationInfo};

    #[test]
    fn test_descriptors() {
        assert_eq!(
            Me.descriptor(),
            OperationDescriptor {
                allowed_methods: vec![Method::GET],
                requires_auth: true,
            }
        );
        assert!(!Version.descriptor().requires_auth);
        assert!(!Operations.descriptor().requires_auth);
    }

    #[tokio::test]
    async fn test_me_returns_identity() {
        let identity = Identity::new("admin@example.com").with_attribute("nick", "admin");
        let response = Me
            .exec(Some(&identity), &ServerContext::default())
            .await
            .unwrap();
        assert_eq!(response.body["id"], "admin@example.com");
        assert_eq!(response.body["attributes"]["nick"], "admin");
    }

    #[tokio::test]
    async fn test_me_without_identity() {
        let result = Me.exec(None, &ServerContext::default()).await;
        assert!(matches!(result, Err(RockerError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_version_and_operations() {
        let server = ServerContext {
            version: "1.2.3".to_string(),
            operations: vec![OperationInfo {
                name: "Me".to_string(),
                methods: vec!["GET".to_string()],
                path: "/me".to_string(),
            }],
            ..Default::default()
        };

        let version = Version.exec(None, &server).await.unwrap();
        assert_eq!(version.body, json!({ "version": "1.2.3" }));

        let listing = Operations.exec(None, &server).await.unwrap();
        assert_eq!(
            listing.body,
            json!([{ "name": "Me", "methods": ["GET"], "path": "/me" }])
        );
    }
}
