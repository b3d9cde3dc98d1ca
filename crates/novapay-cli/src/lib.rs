//! Interactive terminal shell for the NovaPay prototype.

#![deny(unsafe_code)]

pub mod commands;
pub mod error;
pub mod output;
pub mod repl;

pub use commands::Command;
pub use error::ShellError;
pub use output::OutputFormat;
pub use repl::{Control, Repl};
