//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the external API routing, including the `/mcp` listener and metadata endpoints.

pub mod handlers;
