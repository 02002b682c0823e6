//! Personal book library manager.
//!
//! - `domain` — Book / Library aggregate and the repository abstraction
//! - `application` — load/save/export use cases
//! - `infra` — JSON file repository
//! - `interface` — interactive menu and MCP server hosts

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod interface;
