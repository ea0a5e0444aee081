//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod parse;
pub mod show;

// Re-export main command functions
pub use parse::{execute_parse, ParseArgs};
pub use show::{execute_json, execute_show};
