use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workspace (group) metadata returned by the groups endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Workspace id.
    pub id: String,
    /// Workspace display name.
    pub name: String,
    /// Workspace kind, e.g. `Workspace`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub workspace_type: Option<String>,
    /// Provisioning state, e.g. `Active`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// True when the workspace is backed by dedicated capacity.
    #[serde(
        rename = "isOnDedicatedCapacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_on_dedicated_capacity: Option<bool>,
    /// Additional fields returned by the API.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
