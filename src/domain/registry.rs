//! Tool capability interface and the immutable registry built at startup

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use rust_mcp_sdk::schema::Tool;
use serde_json::{Map, Value};

use crate::domain::{
    ad_activity::AdActivity,
    playbooks::{GetPlaybook, SearchPlaybooks},
};
use crate::errors::AppError;

/// A named unit of functionality invocable through `tools/call`.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Descriptor advertised by `tools/list`.
    fn descriptor(&self) -> Tool;

    /// Returns the tool's structured output. Argument problems should surface as
    /// [`AppError::InvalidParams`]; anything else is reported as an execution failure.
    async fn invoke(&self, arguments: Map<String, Value>) -> Result<Map<String, Value>, AppError>;
}

#[derive(Debug, thiserror::Error)]
#[error("tool `{0}` is registered more than once")]
pub struct DuplicateTool(pub String);

pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn ToolHandler>>) -> Result<Self, DuplicateTool> {
        let mut index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            if index.insert(tool.name(), position).is_some() {
                return Err(DuplicateTool(tool.name().to_string()));
            }
        }

        Ok(Self { tools, index })
    }

    pub fn builtin() -> Result<Self, DuplicateTool> {
        let tools: Vec<Arc<dyn ToolHandler>> = vec![
            Arc::new(AdActivity),
            Arc::new(SearchPlaybooks),
            Arc::new(GetPlaybook),
        ];
        Self::new(tools)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.index.get(name).map(|position| &self.tools[*position])
    }

    pub fn descriptors(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.descriptor()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|tool| tool.name())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_registry_keeps_insertion_order() {
        let registry = ToolRegistry::builtin().expect("builtin registry");
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["get_ad_activity", "search_playbooks", "get_playbook"]);
        assert_eq!(
            names.iter().collect::<HashSet<_>>().len(),
            registry.len(),
            "tool names must be unique"
        );
    }

    #[test]
    fn descriptors_follow_registry_order() {
        let registry = ToolRegistry::builtin().expect("builtin registry");
        let descriptor_names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|tool| tool.name)
            .collect();
        assert_eq!(
            descriptor_names,
            registry.names().map(str::to_string).collect::<Vec<_>>()
        );
    }

    #[test]
    fn lookup_is_exact() {
        let registry = ToolRegistry::builtin().expect("builtin registry");
        assert!(registry.get("search_playbooks").is_some());
        assert!(registry.get("Search_Playbooks").is_none());
        assert!(registry.get("codex.search_playbooks").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let tools: Vec<Arc<dyn ToolHandler>> = vec![Arc::new(AdActivity), Arc::new(AdActivity)];
        let err = ToolRegistry::new(tools).expect_err("duplicate tool");
        assert_eq!(err.0, "get_ad_activity");
    }
}
