#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

//! # kube-mcp
//!
//! An MCP (Model Context Protocol) server that lets a language-model agent
//! perform CRUD operations on Kubernetes resources.
//!
//! Resource names are resolved against a scheme built at startup (a static
//! table of well-known kinds seeded under the authoritative list discovered
//! from the live cluster) and dispatched through a dynamically-typed client,
//! so resources unknown at compile time (CRDs included) work out of the box.
//!
//! This crate provides:
//! - Resource scheme resolution (builtin seed + live discovery overlay)
//! - Dynamic CRUD dispatch with a per-resource handle cache
//! - Chat backends used to normalize YAML manifests into JSON
//! - The MCP server binary (`kube-mcp`), JSON-RPC 2.0 over stdio

// Chat backends (manifest transformation)
pub mod ai;

// Cluster connection and per-resource handles
pub mod cluster;

// Configuration
pub mod config;

// Dynamic CRUD dispatch
pub mod dispatch;

// Error types
pub mod errors;

// MCP tool schemas
pub mod mcp;

// Resource scheme resolution
pub mod scheme;

// Re-export key types for convenience
pub use cluster::{ClusterConnection, DynamicHandle, HandleCache};
pub use config::{KubernetesConfig, LlmConfig, McpConfig, ServerConfig};
pub use dispatch::Dispatcher;
pub use errors::{ServerError, ServerResult};
pub use scheme::{ResourceDescriptor, Scheme};
