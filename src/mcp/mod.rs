//! Model Context Protocol (MCP) integration for Rusty Corpus.
//!
//! Wires the corpus service into an MCP server so agent hosts can inspect and search a
//! company's documents and call recordings over stdio. The surface area consists of:
//!
//! - Tools: `corpus-status`, `corpus-stats`, `list-documents`, `get-document`,
//!   `search-corpus`, `query-corpus`, `prepare-document`, and `metrics`.
//! - Resources: `mcp://health`, `mcp://settings`, and `mcp://usage`.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::RustyCorpusMcpServer;
