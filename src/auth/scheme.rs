//! Credential encodings carried in the authorization header.

use super::credentials::Credentials;
use super::rc4;
use crate::error::{Result, RockerError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::str::FromStr;

/// Supported authorization schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// `base64("identity:secret")`
    Basic,
    /// `base64(RC4("identity:secret", shared key))`
    Rc4,
}

impl AuthScheme {
    /// Canonical header token for the scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "Basic",
            AuthScheme::Rc4 => "RC4",
        }
    }

    /// Encode credentials into a header payload.
    ///
    /// `key` is the pre-shared RC4 key and is ignored for Basic.
    ///
    /// # Errors
    /// Returns `Config` when RC4 is used without a key or with an empty one.
    pub fn encode(&self, credentials: &Credentials, key: Option<&[u8]>) -> Result<String> {
        let plain = credentials.to_pair();
        match self {
            AuthScheme::Basic => Ok(STANDARD.encode(plain.as_bytes())),
            AuthScheme::Rc4 => {
                let key = key.unwrap_or_default();
                let encrypted = rc4::apply(key, plain.as_bytes())?;
                Ok(STANDARD.encode(encrypted))
            }
        }
    }

    /// Decode a header payload back into the credential pair.
    ///
    /// Only recovers what the caller claims; checking the secret belongs to
    /// an [`IdentityProvider`](super::IdentityProvider).
    ///
    /// # Errors
    /// `AuthFailed` when the payload is not base64 or has no `:` separator,
    /// `Config` when RC4 is used without a key.
    pub fn decode(&self, payload: &str, key: Option<&[u8]>) -> Result<Credentials> {
        let raw = STANDARD
            .decode(payload.trim())
            .map_err(|_| RockerError::AuthFailed("payload is not valid base64".to_string()))?;

        let plain = match self {
            AuthScheme::Basic => raw,
            AuthScheme::Rc4 => rc4::apply(key.unwrap_or_default(), &raw)?,
        };

        Credentials::from_pair(&plain)
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = RockerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("basic") {
            Ok(AuthScheme::Basic)
        } else if s.eq_ignore_ascii_case("rc4") {
            Ok(AuthScheme::Rc4)
        } else {
            Err(RockerError::UnsupportedScheme(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(identity: &str, secret: &str) -> Credentials {
        Credentials::new(identity.to_string(), secret.to_string())
    }

    #[test]
    fn test_basic_encode() {
        let payload = AuthScheme::Basic.encode(&creds("user", "pass"), None).unwrap();
        assert_eq!(payload, "dXNlcjpwYXNz");
    }

    #[test]
    fn test_basic_decode_splits_on_first_colon() {
        let payload = STANDARD.encode("user:pa:ss");
        let decoded = AuthScheme::Basic.decode(&payload, None).unwrap();
        assert_eq!(decoded.identity, "user");
        assert_eq!(decoded.secret, "pa:ss");
    }

    #[test]
    fn test_rc4_round_trip() {
        let cases = [
            ("admin@example.com", "hunter2", "shared"),
            ("a", "", "k"),
            ("", "only-secret", "longer shared key with spaces"),
            ("ünïcode", "päss", "ключ"),
        ];
        for (identity, secret, key) in cases {
            let payload = AuthScheme::Rc4
                .encode(&creds(identity, secret), Some(key.as_bytes()))
                .unwrap();
            let decoded = AuthScheme::Rc4.decode(&payload, Some(key.as_bytes())).unwrap();
            assert_eq!(decoded.identity, identity);
            assert_eq!(decoded.secret, secret);
        }
    }

    #[test]
    fn test_rc4_payload_hides_secret() {
        let payload = AuthScheme::Rc4
            .encode(&creds("user", "pass"), Some(b"k3y"))
            .unwrap();
        assert_ne!(payload, "dXNlcjpwYXNz");
    }

    #[test]
    fn test_rc4_empty_key_is_config_error() {
        for key in [Some(&b""[..]), None] {
            let result = AuthScheme::Rc4.encode(&creds("user", "pass"), key);
            assert!(matches!(result, Err(RockerError::Config(_))));
        }
    }

    #[test]
    fn test_rc4_wrong_key_without_separator_is_auth_failed() {
        let encrypted = rc4::apply(b"right", b"nocolonhere").unwrap();
        let payload = STANDARD.encode(encrypted);
        let result = AuthScheme::Rc4.decode(&payload, Some(b"right"));
        assert!(matches!(result, Err(RockerError::AuthFailed(_))));
    }

    #[test]
    fn test_malformed_base64_is_auth_failed() {
        for scheme in [AuthScheme::Basic, AuthScheme::Rc4] {
            let result = scheme.decode("***not base64***", Some(b"k"));
            assert!(matches!(result, Err(RockerError::AuthFailed(_))));
        }
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("Basic".parse::<AuthScheme>().unwrap(), AuthScheme::Basic);
        assert_eq!("rc4".parse::<AuthScheme>().unwrap(), AuthScheme::Rc4);
        assert!(matches!(
            "Bearer".parse::<AuthScheme>(),
            Err(RockerError::UnsupportedScheme(s)) if s == "Bearer"
        ));
    }
}
