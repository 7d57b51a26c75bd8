//! # Xray API Endpoints
//!
//! Endpoint implementations for the "Xray for Jira" REST API, organized by
//! resource.

pub mod imports;
