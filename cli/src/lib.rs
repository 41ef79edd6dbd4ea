//! ui-rag command line library
//!
//! Argument parsing, command execution and the timeout boundary used by the
//! `ui-rag` binary.

pub mod app;
pub mod args;
pub mod error;
pub mod runner;

pub use app::App;
pub use args::{Cli, Command};
pub use error::{CliError, CliResult};
pub use runner::run_blocking;
