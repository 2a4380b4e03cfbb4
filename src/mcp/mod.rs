//! MCP protocol surface.
//!
//! Tool schemas live here; the JSON-RPC server itself is the `kube-mcp`
//! binary at `src/mcp/server.rs`.

pub mod tools;
