//! Shared utilities for Hiroba.
//!
//! Logging setup and time helpers used by every binary and test in the workspace.

pub mod logger;
pub mod time;
