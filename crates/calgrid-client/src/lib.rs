//! Command-line front end for calgrid.
//!
//! This crate provides the `calgrid` command-line interface: normalizing
//! provider payloads, encoding recurrence rules, computing lane layouts
//! and snapping drag offsets.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
