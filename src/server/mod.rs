//! Server side of rocker: operations, the dispatcher enforcing their policy
//! and an axum adapter exposing them over HTTP.

pub mod builtin;
pub mod dispatcher;
pub mod operation;
pub mod router;

pub use builtin::{Me, Operations, Version};
pub use dispatcher::Dispatcher;
pub use operation::{
    Operation, OperationDescriptor, OperationInfo, OperationResponse, ServerContext,
};
pub use router::OperationRegistry;
