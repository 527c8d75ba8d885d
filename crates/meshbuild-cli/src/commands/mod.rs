//! CLI commands

pub mod config;
pub mod extract;
pub mod resolve;
pub mod versions;
