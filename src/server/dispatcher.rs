//! Enforces method and authentication policy before running an operation.

use super::operation::{Operation, OperationResponse, ServerContext};
use crate::auth::{AuthHeaderValue, AuthManager, Identity};
use crate::error::{Result, RockerError};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method};
use tracing::debug;

/// Runs method check, auth check and exec in that order. The first stage to
/// fail ends the request.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    auth: AuthManager,
}

impl Dispatcher {
    pub fn new(auth: AuthManager) -> Self {
        Self { auth }
    }

    pub async fn dispatch(
        &self,
        operation: &dyn Operation,
        method: &Method,
        headers: &HeaderMap,
        server: &ServerContext,
    ) -> Result<OperationResponse> {
        if !operation.allowed_methods().contains(method) {
            debug!("{} does not allow {}", operation.name(), method);
            return Err(RockerError::MethodNotAllowed {
                method: method.to_string(),
                allowed: operation
                    .allowed_methods()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            });
        }

        let identity = if operation.requires_auth() {
            let header = match parse_authorization(headers) {
                Some(Ok(header)) => header,
                Some(Err(e)) => {
                    debug!("Unusable authorization header for {}: {}", operation.name(), e);
                    return Err(RockerError::AuthRequired);
                }
                None => return Err(RockerError::AuthRequired),
            };
            Some(self.auth.authenticate(&header).await?)
        } else {
            self.optional_identity(headers).await
        };

        operation.exec(identity.as_ref(), server).await
    }

    /// Best effort identity for operations that do not require auth.
    async fn optional_identity(&self, headers: &HeaderMap) -> Option<Identity> {
        let header = parse_authorization(headers)?.ok()?;
        match self.auth.authenticate(&header).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                debug!("Ignoring failed optional authentication: {}", e);
                None
            }
        }
    }
}

/// `None` when no header was sent.
fn parse_authorization(headers: &HeaderMap) -> Option<Result<AuthHeaderValue>> {
    let raw = headers.get(AUTHORIZATION)?;
    Some(
        raw.to_str()
            .map_err(|_| RockerError::MalformedHeader)
            .and_then(AuthHeaderValue::parse),
    )
}
