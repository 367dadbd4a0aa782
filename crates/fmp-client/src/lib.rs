//! Async client for the Financial Modeling Prep (FMP) REST API.
//!
//! This crate contains no protocol logic; it is consumed by the
//! `fmp-mcp-server` binary, which exposes these calls as MCP tools and
//! resources. Every public method performs exactly one authenticated GET
//! against the upstream API.

pub mod client;
pub mod config;
pub mod error;

pub use client::{FmpClient, Period};
pub use config::FmpConfig;
pub use error::{FmpError, Result};
