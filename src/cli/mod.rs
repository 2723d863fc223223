//! Command-line interface for refit
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod setup;

pub use args::{parse_args, Cli, Commands, DiscoveryArgs};
pub use commands::handle_command;
pub use setup::{configure_thread_pool, init_logging, MAIN_STACK_SIZE};
