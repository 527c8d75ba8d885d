//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.
//! Initialization failures reported by `resolve` are diagnostics only and do
//! not produce a non-zero exit.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Extraction error - a manifest document could not be processed
pub const EXTRACTION_ERROR: i32 = 2;

/// Configuration error - invalid build configuration file
pub const CONFIG_ERROR: i32 = 3;

/// Remote error - a remote source could not be reached
pub const REMOTE_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
