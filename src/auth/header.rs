//! The `Authorization` header value: `<scheme> <payload>`.

use super::scheme::AuthScheme;
use crate::error::{Result, RockerError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderValue {
    pub scheme: AuthScheme,
    /// Base64 payload, opaque at this level
    pub payload: String,
}

impl AuthHeaderValue {
    pub fn new(scheme: AuthScheme, payload: String) -> Self {
        Self { scheme, payload }
    }

    /// Parse a raw header. Exactly two whitespace separated tokens are
    /// accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut tokens = raw.split_whitespace();
        let (Some(scheme), Some(payload), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(RockerError::MalformedHeader);
        };

        Ok(Self::new(scheme.parse()?, payload.to_string()))
    }

    /// Format as `<scheme> <payload>`.
    pub fn build(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AuthHeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.scheme, self.payload)
    }
}

impl FromStr for AuthHeaderValue {
    type Err = RockerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
