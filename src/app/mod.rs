//! Command line application for managing remote servers.

pub mod handler;
pub mod state;

pub use handler::Handler;
pub use state::{Action, App, NewServer};
