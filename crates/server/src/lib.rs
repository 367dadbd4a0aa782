//! MCP server for the Financial Modeling Prep API.
//!
//! Three protocol surfaces, all static:
//! - tools: one per FMP endpoint, each backed by a single GET
//! - resources: URI-addressed JSON views over a subset of endpoints
//! - prompts: canned analysis walkthroughs, not backed by any API call

pub mod prompts;
pub mod resources;
pub mod service;
pub mod tools;

pub use service::FmpService;
