pub mod mcp;
pub mod menu;
