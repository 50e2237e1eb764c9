//! CLI command implementations.

pub mod args;
pub mod output;

pub mod call;
pub mod info;
pub mod list;
pub mod note;
pub mod query;

pub use args::{Cli, Commands};
pub use output::Output;
