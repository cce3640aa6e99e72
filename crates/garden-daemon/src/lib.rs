//! Knowledge Garden daemon library.
//!
//! CLI argument types and command handlers for the `garden-daemon` binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, NoteCommands};
pub use commands::run;
