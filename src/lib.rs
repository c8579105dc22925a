//! rocker - authenticated remote operations over HTTP.
//!
//! The server side exposes [`server::Operation`]s through a
//! [`server::Dispatcher`] that checks the request method and the
//! `Authorization` header before running them. The client side keeps a
//! registry of named servers in a [`store::CredentialStore`] and talks to
//! them with a [`client::RemoteClient`].

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod ui;

pub use error::{Result, RockerError};
