#![deny(missing_docs)]

//! Core library for the Rusty Corpus server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Corpus assembly, chunking, statistics, and search.
pub mod corpus;
/// Text generation client abstraction and adapters.
pub mod generation;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Corpus activity counters.
pub mod metrics;
/// Record store access for company documents and call recordings.
pub mod store;
