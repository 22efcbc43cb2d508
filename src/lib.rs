//! router-smoke - Smoke tests for an LLM routing service
//!
//! This library provides the pieces of the `router-smoke` tool: fixtures,
//! configuration, the HTTP client that probes the router, and the suite
//! runner that prints human-readable pass/fail output.

pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod suite;

pub use config::Config;
pub use error::{Error, Result};
