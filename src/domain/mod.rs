//! Tool registry and the built-in tools
//!
//! Provides the mock advertiser and playbook functionality exposed over the MCP protocol

pub mod ad_activity;
pub mod playbooks;
pub mod registry;
pub mod utils;
