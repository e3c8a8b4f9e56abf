//! Mock advertiser activity metrics
//!
//! The records are illustrative constants; nothing here talks to an ad platform.

use async_trait::async_trait;
use rust_mcp_sdk::{macros, schema::Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{registry::ToolHandler, utils::parse_arguments};
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRecord {
    pub platform: &'static str,
    pub vertical: &'static str,
    pub status: &'static str,
    pub impressions: u64,
    pub clicks: u64,
}

pub static AD_ACTIVITY: [ActivityRecord; 3] = [
    ActivityRecord {
        platform: "meta",
        vertical: "retail",
        status: "active",
        impressions: 12_345,
        clicks: 678,
    },
    ActivityRecord {
        platform: "google",
        vertical: "retail",
        status: "active",
        impressions: 9_870,
        clicks: 412,
    },
    ActivityRecord {
        platform: "tiktok",
        vertical: "consumer-electronics",
        status: "paused",
        impressions: 4_210,
        clicks: 97,
    },
];

#[macros::mcp_tool(
    name = "get_ad_activity",
    description = "Return advertiser activity metrics across ad platforms"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAdActivityTool {
    /// Advertiser identifier, echoed back in the result.
    #[serde(rename = "advertiserId")]
    pub advertiser_id: Option<String>,
}

pub struct AdActivity;

#[async_trait]
impl ToolHandler for AdActivity {
    fn name(&self) -> &'static str {
        "get_ad_activity"
    }

    fn descriptor(&self) -> Tool {
        GetAdActivityTool::tool()
    }

    async fn invoke(&self, arguments: Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let args: GetAdActivityTool = parse_arguments(arguments)?;

        Ok(Map::from_iter([
            ("advertiserId".to_string(), json!(args.advertiser_id)),
            ("activity".to_string(), serde_json::to_value(&AD_ACTIVITY)?),
        ]))
    }
}
