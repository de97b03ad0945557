//! Operator command line adapter.
//!
//! Parses arguments with clap, dispatches to the application handlers and
//! renders their results as report lines.

mod args;
mod commands;
mod error;
mod report;

pub use args::{Cli, Command};
pub use commands::AdminServices;
pub use error::AdminError;
pub use report::{subscription_line, user_line};
