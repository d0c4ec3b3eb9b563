//! JSON bodies exchanged between the viewer and the backend.

use serde::{Deserialize, Serialize};

use crate::app::azure::TagMap;

pub const HIERARCHY_FAILED: &str = "Failed to fetch Azure hierarchy";
pub const TAGS_UPDATE_FAILED: &str = "Failed to update tags";
pub const TAGS_UPDATED: &str = "Tags updated successfully";
pub const WELCOME: &str = "Welcome to the Azure Tags API!";

/// `PUT /api/tags` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagsRequest {
    pub resource_id: String,
    pub tags: TagMap,
}

/// `PUT /api/tags` success body; `data` is the provider's response verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTagsResponse {
    pub message: String,
    pub data: serde_json::Value,
}

/// Body of every 500 answered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
