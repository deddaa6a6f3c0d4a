//! Core modules shared by every wrapper command.
//!
//! Errors, process execution, the snap layout, configuration and user-facing
//! output live here. Nothing in `core` knows about individual addons.

pub mod config;
pub mod error;
pub mod exec;
pub mod output;
pub mod snap;
