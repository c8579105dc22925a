//! HTTP client for a remote rocker server.

use crate::auth::Identity;
use crate::config::{ME_PATH, OPERATIONS_PATH, REQUEST_TIMEOUT_SECS, VERSION_PATH};
use crate::error::{Result, RockerError};
use crate::server::OperationInfo;
use crate::store::Profile;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct VersionResponse {
    version: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client bound to one server profile.
///
/// The stored authorization header is attached to every request exactly as
/// it was saved; the client never decodes it.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base: Url,
    auth: HeaderValue,
    http: reqwest::Client,
}

impl RemoteClient {
    /// Create a client for `profile` with the default request timeout.
    pub fn new(profile: &Profile) -> Result<Self> {
        Self::with_timeout(profile, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(profile: &Profile, timeout: Duration) -> Result<Self> {
        let base = Url::parse(&profile.address).map_err(|e| {
            RockerError::Config(format!("invalid address for {}: {}", profile.name, e))
        })?;
        let mut auth = HeaderValue::from_str(&profile.auth).map_err(|_| {
            RockerError::Config(format!(
                "stored credentials for {} are not a valid header value",
                profile.name
            ))
        })?;
        auth.set_sensitive(true);

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { base, auth, http })
    }

    /// Base URI requests are resolved against.
    pub fn base_uri(&self) -> &Url {
        &self.base
    }

    /// Issue an authenticated request to `path`, relative to the base URI,
    /// and decode the JSON response.
    ///
    /// # Errors
    /// `AuthFailed` on 401/403, `Operation` for other error statuses carrying
    /// the server's message, `Network` for transport failures.
    pub async fn request<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| RockerError::Config(format!("invalid path '{}': {}", path, e)))?;

        debug!("{} {}", method, url);
        let response = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        debug!("Request failed with {}: {}", status, message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RockerError::AuthFailed(message))
            }
            _ => Err(RockerError::operation(status.as_u16(), message)),
        }
    }

    /// Fetch the identity the stored credentials authenticate as.
    pub async fn check_identity(&self) -> Result<Identity> {
        self.request(Method::GET, ME_PATH).await
    }

    pub async fn server_version(&self) -> Result<String> {
        let response: VersionResponse = self.request(Method::GET, VERSION_PATH).await?;
        Ok(response.version)
    }

    /// Operations the server has registered.
    pub async fn list_operations(&self) -> Result<Vec<OperationInfo>> {
        self.request(Method::GET, OPERATIONS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(address: &str, auth: &str) -> Profile {
        Profile {
            name: "test".to_string(),
            address: address.to_string(),
            auth: auth.to_string(),
        }
    }

    #[test]
    fn test_base_uri() {
        let client = RemoteClient::new(&profile("https://h/api/", "Basic x")).unwrap();
        assert_eq!(client.base_uri().as_str(), "https://h/api/");
        assert_eq!(client.base_uri().join(ME_PATH).unwrap().as_str(), "https://h/api/me");
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let result = RemoteClient::new(&profile("https://h/", "Basic a\nb"));
        assert!(matches!(result, Err(RockerError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = RemoteClient::with_timeout(
            &profile("http://127.0.0.1:9/", "Basic x"),
            Duration::from_millis(500),
        )
        .unwrap();
        assert!(matches!(
            client.server_version().await,
            Err(RockerError::Network(_))
        ));
    }
}
