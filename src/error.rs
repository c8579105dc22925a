//! Error types for rocker.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by the auth schemes, the credential store, the remote
/// client and the dispatcher.
#[derive(Debug, Error)]
pub enum RockerError {
    /// Authorization header is not `<scheme> <payload>`.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Scheme token is neither `Basic` nor `RC4`.
    #[error("unsupported authorization scheme: {0}")]
    UnsupportedScheme(String),

    /// Credentials were supplied but could not be verified.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Operation requires credentials and none were usable.
    #[error("authentication required")]
    AuthRequired,

    /// Invalid configuration such as an empty RC4 key.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server \"{0}\" does not exist")]
    UnknownProfile(String),

    #[error("no server given as argument nor set as default")]
    NoDefaultSet,

    /// Persisting the credential store failed.
    #[error("failed to save server list: {0}")]
    StoreIo(#[source] std::io::Error),

    /// Request method is not in the operation's allowed set.
    #[error("method {method} not allowed")]
    MethodNotAllowed {
        method: String,
        allowed: Vec<String>,
    },

    #[error("network error: {0}")]
    Network(String),

    /// Identity lookup did not finish in time.
    #[error("identity lookup timed out")]
    LookupTimeout,

    /// Operation specific failure with the status it should be reported as.
    #[error("{message}")]
    Operation { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RockerError {
    /// Create an operation error carrying its own status code.
    pub fn operation(status: u16, message: impl Into<String>) -> Self {
        Self::Operation {
            status,
            message: message.into(),
        }
    }

    /// HTTP status reported for this error at the server boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedHeader | Self::UnsupportedScheme(_) => StatusCode::BAD_REQUEST,
            Self::AuthFailed(_) | Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnknownProfile(_) => StatusCode::NOT_FOUND,
            Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::LookupTimeout => StatusCode::SERVICE_UNAVAILABLE,
            Self::Operation { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Config(_)
            | Self::NoDefaultSet
            | Self::StoreIo(_)
            | Self::Io(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RockerError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RockerError>;
