//! Curated operational playbooks for marketing and comms teams
//!
//! Exposes `search_playbooks` and `get_playbook` over a fixed in-memory catalog.

use async_trait::async_trait;
use rust_mcp_sdk::{macros, schema::Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{
    registry::ToolHandler,
    utils::{
        bound_integer_property, normalize_playbook_limit, parse_arguments, MAX_PLAYBOOK_LIMIT,
    },
};
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playbook {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub tags: &'static [&'static str],
    pub recommended_actions: &'static [&'static str],
}

impl Playbook {
    fn matches(&self, needle: &str) -> bool {
        format!("{} {} {}", self.title, self.summary, self.tags.join(" "))
            .to_lowercase()
            .contains(needle)
    }
}

pub static PLAYBOOKS: [Playbook; 3] = [
    Playbook {
        id: "creative-audit",
        title: "Rapid creative audit",
        summary: "Checklist for reviewing ads before launch, focusing on claims, disclosures, and brand safety.",
        tags: &["creative", "compliance", "brand"],
        recommended_actions: &[
            "Verify all claims have supporting evidence and links.",
            "Check that landing pages mirror ad promises.",
            "Confirm required disclosures for pricing, subscriptions, and offers.",
        ],
    },
    Playbook {
        id: "budget-shift",
        title: "Budget reallocation triage",
        summary: "Guidance for shifting spend between channels when performance changes.",
        tags: &["budget", "media", "performance"],
        recommended_actions: &[
            "Review channel-level CAC and recent trend deltas.",
            "Move discretionary spend to channels with stable ROAS.",
            "Flag experiments that can be paused without harming learnings.",
        ],
    },
    Playbook {
        id: "crisis-response",
        title: "Crisis response checklist",
        summary: "Steps to pause or adjust campaigns when sensitive events occur.",
        tags: &["brand", "safety", "incident"],
        recommended_actions: &[
            "Pause campaigns with sensitive keywords or creative themes.",
            "Update negative keyword lists and placement exclusions.",
            "Prepare holding statements for customer support scripts.",
        ],
    },
];

/// Case-insensitive substring search over title, summary and tags, in catalog order.
pub fn search_playbooks(query: &str, limit: usize) -> Vec<&'static Playbook> {
    let needle = query.to_lowercase();
    PLAYBOOKS
        .iter()
        .filter(|playbook| playbook.matches(&needle))
        .take(limit)
        .collect()
}

pub fn find_playbook(id: &str) -> Option<&'static Playbook> {
    PLAYBOOKS.iter().find(|playbook| playbook.id == id)
}

pub fn playbook_ids() -> Vec<&'static str> {
    PLAYBOOKS.iter().map(|playbook| playbook.id).collect()
}

#[macros::mcp_tool(
    name = "search_playbooks",
    description = "Search curated operational playbooks for marketing and comms teams"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchPlaybooksTool {
    /// Keywords to match against titles, summaries, and tags.
    pub query: String,
    /// Maximum number of entries to return (1-10, default 3).
    pub limit: Option<u32>,
}

#[macros::mcp_tool(name = "get_playbook", description = "Fetch a specific playbook by its ID")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetPlaybookTool {
    /// Identifier of the playbook (e.g. creative-audit).
    pub id: String,
}

pub struct SearchPlaybooks;

#[async_trait]
impl ToolHandler for SearchPlaybooks {
    fn name(&self) -> &'static str {
        "search_playbooks"
    }

    fn descriptor(&self) -> Tool {
        bound_integer_property(
            SearchPlaybooksTool::tool(),
            "limit",
            1,
            MAX_PLAYBOOK_LIMIT as u64,
        )
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let args: SearchPlaybooksTool = parse_arguments(arguments)?;
        let limit = normalize_playbook_limit(args.limit)?;
        let matches = search_playbooks(&args.query, limit);

        Ok(Map::from_iter([
            ("returned".to_string(), json!(matches.len())),
            ("playbooks".to_string(), serde_json::to_value(matches)?),
        ]))
    }
}

pub struct GetPlaybook;

#[async_trait]
impl ToolHandler for GetPlaybook {
    fn name(&self) -> &'static str {
        "get_playbook"
    }

    fn descriptor(&self) -> Tool {
        GetPlaybookTool::tool()
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let args: GetPlaybookTool = parse_arguments(arguments)?;
        let id = args.id;

        match find_playbook(&id) {
            Some(playbook) => match serde_json::to_value(playbook)? {
                Value::Object(content) => Ok(content),
                _ => Err(AppError::tool_failed(self.name(), "playbook is not an object")),
            },
            None => Ok(Map::from_iter([
                (
                    "error".to_string(),
                    json!(format!("Playbook '{id}' was not found")),
                ),
                ("availablePlaybooks".to_string(), json!(playbook_ids())),
            ])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object arguments")
    }

    #[test]
    fn brand_matches_audit_and_crisis_only() {
        let ids: Vec<_> = search_playbooks("brand", 3)
            .into_iter()
            .map(|playbook| playbook.id)
            .collect();
        assert_eq!(ids, ["creative-audit", "crisis-response"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        assert_eq!(search_playbooks("ROAS", 3).len(), 0, "actions are not searched");
        assert_eq!(search_playbooks("MEDIA", 3)[0].id, "budget-shift");
        assert_eq!(search_playbooks("Crisis Response", 3)[0].id, "crisis-response");
    }

    #[test]
    fn search_truncates_in_catalog_order() {
        let ids: Vec<_> = search_playbooks("", 2)
            .into_iter()
            .map(|playbook| playbook.id)
            .collect();
        assert_eq!(ids, ["creative-audit", "budget-shift"]);
    }

    #[tokio::test]
    async fn search_tool_requires_query() {
        let err = SearchPlaybooks
            .invoke(Map::new())
            .await
            .expect_err("missing query");
        assert_eq!(err.rpc_code(), -32602);
    }

    #[tokio::test]
    async fn search_tool_rejects_large_limit() {
        let err = SearchPlaybooks
            .invoke(arguments(json!({"query": "brand", "limit": 11})))
            .await
            .expect_err("limit too large");
        assert!(matches!(err, AppError::InvalidParams { code: "invalid_limit", .. }));
    }

    #[tokio::test]
    async fn get_playbook_returns_camel_case_fields() {
        let content = GetPlaybook
            .invoke(arguments(json!({"id": "budget-shift"})))
            .await
            .expect("known playbook");
        assert_eq!(content["title"], "Budget reallocation triage");
        assert_eq!(
            content["recommendedActions"].as_array().map(Vec::len),
            Some(3)
        );
    }

    #[tokio::test]
    async fn padded_or_empty_ids_are_not_found() {
        for id in [" budget-shift ", "BUDGET-SHIFT", ""] {
            let content = GetPlaybook
                .invoke(arguments(json!({ "id": id })))
                .await
                .expect("not found is not an error");
            assert_eq!(content["error"], format!("Playbook '{id}' was not found"));
            assert_eq!(
                content["availablePlaybooks"],
                json!(["creative-audit", "budget-shift", "crisis-response"])
            );
        }
    }

    #[test]
    fn search_descriptor_declares_limit_bounds() {
        let descriptor =
            serde_json::to_value(SearchPlaybooks.descriptor()).expect("serialize descriptor");
        let limit = &descriptor["inputSchema"]["properties"]["limit"];
        assert_eq!(limit["minimum"], 1);
        assert_eq!(limit["maximum"], 10);
        assert!(descriptor["inputSchema"]["properties"]["query"]
            .get("minimum")
            .is_none());
    }

    #[tokio::test]
    async fn unknown_playbook_lists_available_ids() {
        let content = GetPlaybook
            .invoke(arguments(json!({"id": "nonexistent"})))
            .await
            .expect("not found is not an error");
        assert_eq!(content["error"], "Playbook 'nonexistent' was not found");
        assert_eq!(
            content["availablePlaybooks"],
            json!(["creative-audit", "budget-shift", "crisis-response"])
        );
    }
}
