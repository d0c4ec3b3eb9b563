use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag key → tag value. Keys are unique; inserting an existing key replaces its value.
pub type TagMap = BTreeMap<String, String>;

/// One subscription with everything found beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub subscription_id: String,
    pub display_name: String,
    pub resource_groups: Vec<ResourceGroup>,
}

impl Account {
    pub fn resource_count(&self) -> usize {
        self.resource_groups.iter().map(|rg| rg.resources.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub name: String,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Fully-qualified ARM path, e.g. `/subscriptions/.../resourceGroups/.../providers/...`
    pub id: String,
    pub name: String,
    /// `None` when the provider reported no tags at all; an empty map is kept as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagMap>,
}

impl Resource {
    pub fn is_tagged(&self) -> bool {
        self.tags.is_some()
    }

    /// `Tags: ...` line shown under each resource in the viewer.
    pub fn tags_display(&self) -> String {
        match &self.tags {
            Some(tags) => serde_json::to_string(tags).unwrap_or_else(|_| "{}".to_string()),
            None => "None".to_string(),
        }
    }
}

/// Accounts in upstream order, each embedding its groups and resources.
pub type Hierarchy = Vec<Account>;

/// Envelope used by every ARM list operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubscription {
    pub subscription_id: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawResourceGroup {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Option<TagMap>,
}

impl From<RawResource> for Resource {
    fn from(raw: RawResource) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            tags: raw.tags,
        }
    }
}

/// Body of the default-tags PUT: `{"properties":{"tags":{...}}}`.
#[derive(Debug, Clone, Serialize)]
pub struct TagsResourceBody<'a> {
    pub properties: TagsProperties<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagsProperties<'a> {
    pub tags: &'a TagMap,
}

impl<'a> TagsResourceBody<'a> {
    pub fn new(tags: &'a TagMap) -> Self {
        Self {
            properties: TagsProperties { tags },
        }
    }
}
