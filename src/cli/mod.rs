//! CLI module for elecmate - command-line interface and subcommands.
//!
//! Every subcommand works on the same registry and settings profile as the
//! TUI, which is launched when no subcommand is given.

pub mod commands;

pub use commands::Cli;
