//! Binds operations to routes and funnels every request through the
//! [`Dispatcher`].

use super::builtin::{Me, Operations, Version};
use super::dispatcher::Dispatcher;
use super::operation::{Operation, OperationInfo, OperationResponse, ServerContext};
use crate::config::{ME_PATH, OPERATIONS_PATH, SERVER_VERSION, VERSION_PATH};
use crate::error::RockerError;
use axum::http::header::{ALLOW, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Route table handed to the HTTP runtime at startup.
pub struct OperationRegistry {
    routes: Vec<(String, Arc<dyn Operation>)>,
    context: ServerContext,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Empty registry reporting this crate's version.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            context: ServerContext {
                version: SERVER_VERSION.to_string(),
                ..Default::default()
            },
        }
    }

    /// Registry with `/me`, `/version` and `/operations` registered.
    pub fn with_builtins() -> Self {
        Self::new()
            .register(ME_PATH, Me)
            .register(VERSION_PATH, Version)
            .register(OPERATIONS_PATH, Operations)
    }

    /// Bind `operation` to `path`, replacing any operation already there.
    pub fn register(mut self, path: &str, operation: impl Operation + 'static) -> Self {
        let path = format!("/{}", path.trim_start_matches('/'));
        let operation: Arc<dyn Operation> = Arc::new(operation);
        match self.routes.iter_mut().find(|(p, _)| *p == path) {
            Some(route) => route.1 = operation,
            None => self.routes.push((path, operation)),
        }
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.context.version = version.into();
        self
    }

    /// Make a collaborator such as a connection pool available to operations.
    pub fn with_extension<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.context.extensions.insert(value);
        self
    }

    /// Listing of registered operations in registration order.
    pub fn operations(&self) -> Vec<OperationInfo> {
        self.routes
            .iter()
            .map(|(path, operation)| OperationInfo {
                name: operation.name().to_string(),
                methods: operation
                    .allowed_methods()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                path: path.clone(),
            })
            .collect()
    }

    pub fn into_router(mut self, dispatcher: Dispatcher) -> Router {
        self.context.operations = self.operations();
        let context = Arc::new(self.context);
        let dispatcher = Arc::new(dispatcher);

        let mut router = Router::new();
        for (path, operation) in self.routes {
            debug!("Routing {} to {}", path, operation.name());
            let context = Arc::clone(&context);
            let dispatcher = Arc::clone(&dispatcher);
            router = router.route(
                &path,
                any(move |method: Method, headers: HeaderMap| {
                    let context = Arc::clone(&context);
                    let dispatcher = Arc::clone(&dispatcher);
                    let operation = Arc::clone(&operation);
                    async move {
                        dispatcher
                            .dispatch(operation.as_ref(), &method, &headers, &context)
                            .await
                    }
                }),
            );
        }
        router
    }
}

impl IntoResponse for OperationResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl IntoResponse for RockerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }

        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        match &self {
            RockerError::MethodNotAllowed { allowed, .. } => {
                if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                    response.headers_mut().insert(ALLOW, value);
                }
            }
            RockerError::AuthRequired | RockerError::AuthFailed(_) => {
                response.headers_mut().insert(
                    WWW_AUTHENTICATE,
                    HeaderValue::from_static("Basic realm=\"rocker\""),
                );
            }
            _ => {}
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthManager, Credentials, Identity, StaticIdentities};
    use axum::body::{Body, to_bytes};
    use axum::http::header::AUTHORIZATION;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let users = StaticIdentities::new().with_user(Identity::new("user"), "pass");
        let dispatcher = Dispatcher::new(AuthManager::new(Arc::new(users)));
        OperationRegistry::with_builtins()
            .with_version("9.9.9")
            .into_router(dispatcher)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_me_with_credentials() {
        let header = Credentials::new("user".to_string(), "pass".to_string())
            .auth_header(None)
            .unwrap();
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(AUTHORIZATION, header.build())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["id"], "user");
    }

    #[tokio::test]
    async fn test_me_without_credentials() {
        let response = router()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(WWW_AUTHENTICATE));
        assert_eq!(body_json(response).await["error"], "authentication required");
    }

    #[tokio::test]
    async fn test_wrong_method_sets_allow() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_version_and_listing() {
        let version = router()
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(version).await, json!({ "version": "9.9.9" }));

        let listing = router()
            .oneshot(Request::builder().uri("/operations").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listing: Vec<OperationInfo> =
            serde_json::from_value(body_json(listing).await).unwrap();
        let paths: Vec<_> = listing.iter().map(|o| o.path.as_str()).collect();
        assert_eq!(paths, ["/me", "/version", "/operations"]);
    }

    #[test]
    fn test_register_replaces_same_path() {
        let registry = OperationRegistry::new()
            .register("version", Version)
            .register("/version", Me);
        let operations = registry.operations();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].name, "Me");
    }
}
