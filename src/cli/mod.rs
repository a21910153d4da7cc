//! Command-line interface components
//!
//! This module contains CLI-specific code for conoha-ojs: argument parsing
//! and the handlers behind each subcommand.

pub mod args;
pub mod commands;

pub use args::{AuthArgs, Cli, Commands, GlobalArgs, TokenArgs};
pub use commands::{handle_auth, handle_logout, handle_status, handle_token};
