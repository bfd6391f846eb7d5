//! Subcommands of the `invdesk` binary.

pub mod common;
pub mod config;
pub mod preview;
pub mod process;
pub mod scan;
pub mod session;
pub mod workflow;
