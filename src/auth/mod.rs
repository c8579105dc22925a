//! Authentication for rocker.
//!
//! Credentials travel in an `Authorization: <scheme> <payload>` header using
//! either HTTP Basic or an RC4 encryption of the same `identity:secret` pair
//! under a key shared out of band. The client side only builds and stores
//! header values; the server side decodes them and checks the claimed
//! identity through an [`IdentityProvider`].

pub mod credentials;
pub mod header;
pub mod identity;
pub mod manager;
pub mod rc4;
pub mod scheme;

pub use credentials::Credentials;
pub use header::AuthHeaderValue;
pub use identity::{Identity, IdentityProvider, StaticIdentities};
pub use manager::AuthManager;
pub use scheme::AuthScheme;
