//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod init;
pub mod metrics;
pub mod roles;
pub mod validate;
