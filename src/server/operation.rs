//! The contract every remote operation implements.

use crate::auth::Identity;
use crate::error::Result;
use async_trait::async_trait;
use axum::http::{Extensions, Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Successful result of an operation, sent to the caller as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl OperationResponse {
    pub fn new(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

/// Listing entry for a registered operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    #[serde(alias = "class")]
    pub name: String,
    pub methods: Vec<String>,
    pub path: String,
}

/// Policy declared by an operation, queried before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub allowed_methods: Vec<Method>,
    pub requires_auth: bool,
}

/// Server wide collaborators handed to every operation.
///
/// Storage and cache layers are not modelled here; hosts put whatever
/// handles their operations need into `extensions`.
#[derive(Debug, Clone, Default)]
pub struct ServerContext {
    pub version: String,
    pub operations: Vec<OperationInfo>,
    pub extensions: Extensions,
}

/// A remote operation bound to a route.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Name shown in the operations listing.
    fn name(&self) -> &str;

    fn allowed_methods(&self) -> &[Method];

    fn requires_auth(&self) -> bool;

    /// Run the operation. `identity` is always set when
    /// [`requires_auth`](Operation::requires_auth) is true.
    async fn exec(
        &self,
        identity: Option<&Identity>,
        server: &ServerContext,
    ) -> Result<OperationResponse>;

    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor {
            allowed_methods: self.allowed_methods().to_vec(),
            requires_auth: self.requires_auth(),
        }
    }
}
