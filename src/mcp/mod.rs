//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides envelope validation, method dispatch, and response formatting shared by both
//! transports.

pub mod rpc;
pub mod server;
