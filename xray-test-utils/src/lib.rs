//! Test utilities shared across the jira-xray workspace
//!
//! This crate provides common testing infrastructure including:
//! - Temporary home directories holding a `.netrc` ([`NetrcGuard`])
//! - Temporary configuration files ([`ConfigDirsTestGuard`])
//! - Scoped environment variable changes ([`EnvVarGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod config;
pub mod env;
pub mod netrc;

pub use config::ConfigDirsTestGuard;
pub use env::EnvVarGuard;
pub use netrc::NetrcGuard;
