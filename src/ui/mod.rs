//! Console input and output helpers.

pub mod prompt;
pub mod table;

pub use prompt::{prompt, prompt_allowing_empty, prompt_password};
pub use table::Table;
