//! Viewer state machines.
//!
//! ```text
//! HierarchyState:  Loading ──ok──► Loaded(hierarchy)
//!                     │  ▲
//!                    err └──── reload ◄── Loaded | Failed
//!                     ▼
//!                  Failed(message)
//!
//! DraftState:      Closed ──open(resource)──► Editing(draft)
//!                    ▲                          │ add_tag / input edits stay here
//!                    └──── cancel | save ok ────┘ save err keeps Editing
//! ```
//!
//! Nothing here touches the network or egui; the app feeds results in and reads
//! the resulting state back out.

use thiserror::Error;

use crate::app::api_models::UpdateTagsRequest;
use crate::app::azure::{Hierarchy, Resource, TagMap};

pub const INVALID_TAG_FORMAT: &str = "Invalid tag format. Use \"key:value\".";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tag input has no ':' separator")]
    MissingSeparator,
    #[error("tag input has more than one ':' separator")]
    ExtraSeparator,
    #[error("tag key is empty")]
    EmptyKey,
    #[error("tag value is empty")]
    EmptyValue,
    #[error("no resource is being edited")]
    NotEditing,
}

impl ValidationError {
    /// Message shown to the user, whatever the cause
    pub fn user_message(&self) -> &'static str {
        INVALID_TAG_FORMAT
    }
}

/// Split `key:value` on its only `:`; both sides are trimmed and must be non-empty.
pub fn parse_tag_input(input: &str) -> Result<(String, String), ValidationError> {
    let (key, value) = input
        .split_once(':')
        .ok_or(ValidationError::MissingSeparator)?;
    if value.contains(':') {
        return Err(ValidationError::ExtraSeparator);
    }

    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    if value.is_empty() {
        return Err(ValidationError::EmptyValue);
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HierarchyState {
    #[default]
    Loading,
    Loaded(Hierarchy),
    Failed(String),
}

impl HierarchyState {
    pub fn is_loading(&self) -> bool {
        matches!(self, HierarchyState::Loading)
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        match self {
            HierarchyState::Loaded(hierarchy) => Some(hierarchy),
            _ => None,
        }
    }

    /// Manual reload; the previous data is dropped
    pub fn begin_reload(&mut self) {
        *self = HierarchyState::Loading;
    }

    pub fn finish<E: std::fmt::Display>(&mut self, result: Result<Hierarchy, E>) {
        *self = match result {
            Ok(hierarchy) => HierarchyState::Loaded(hierarchy),
            Err(e) => {
                tracing::warn!("Hierarchy fetch failed: {}", e);
                HierarchyState::Failed(FETCH_FAILED.to_string())
            }
        };
    }

    /// Look a resource up by id in the loaded data
    pub fn find_resource(&self, resource_id: &str) -> Option<&Resource> {
        self.hierarchy()?
            .iter()
            .flat_map(|account| &account.resource_groups)
            .flat_map(|group| &group.resources)
            .find(|resource| resource.id == resource_id)
    }
}

pub const FETCH_FAILED: &str = "Failed to fetch hierarchy";

/// Working copy of one resource's tags
#[derive(Debug, Clone, PartialEq)]
pub struct TagDraft {
    pub resource: Resource,
    pub tags: TagMap,
    pub pending_input: String,
    /// A save request is in flight
    pub saving: bool,
}

impl TagDraft {
    pub fn for_resource(resource: &Resource) -> Self {
        Self {
            resource: resource.clone(),
            tags: resource.tags.clone().unwrap_or_default(),
            pending_input: String::new(),
            saving: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DraftState {
    #[default]
    Closed,
    Editing(TagDraft),
}

impl DraftState {
    pub fn is_open(&self) -> bool {
        matches!(self, DraftState::Editing(_))
    }

    pub fn draft(&self) -> Option<&TagDraft> {
        match self {
            DraftState::Editing(draft) => Some(draft),
            DraftState::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut TagDraft> {
        match self {
            DraftState::Editing(draft) => Some(draft),
            DraftState::Closed => None,
        }
    }

    /// Start editing `resource`, seeded from its server-fetched tags.
    /// Any draft already open is replaced.
    pub fn open(&mut self, resource: &Resource) {
        tracing::debug!("Editing tags for {}", resource.id);
        *self = DraftState::Editing(TagDraft::for_resource(resource));
    }

    pub fn cancel(&mut self) {
        *self = DraftState::Closed;
    }

    /// Parse the pending input into the draft. On success the input is cleared;
    /// on failure the draft and input are left untouched.
    pub fn add_pending_tag(&mut self) -> Result<(String, String), ValidationError> {
        let Some(draft) = self.draft_mut() else {
            return Err(ValidationError::NotEditing);
        };
        let (key, value) = parse_tag_input(&draft.pending_input)?;
        draft.tags.insert(key.clone(), value.clone());
        draft.pending_input.clear();
        Ok((key, value))
    }

    /// Build the save request and mark the draft as saving.
    /// Returns `None` when closed or when a save is already in flight.
    pub fn begin_save(&mut self) -> Option<UpdateTagsRequest> {
        let draft = self.draft_mut()?;
        if draft.saving {
            return None;
        }
        draft.saving = true;
        Some(UpdateTagsRequest {
            resource_id: draft.resource.id.clone(),
            tags: draft.tags.clone(),
        })
    }

    /// Apply the outcome of a save. Success closes the editor; failure keeps it
    /// open with the draft intact so the user can retry.
    pub fn finish_save<E>(&mut self, result: &Result<(), E>) {
        match result {
            Ok(()) => *self = DraftState::Closed,
            Err(_) => {
                if let Some(draft) = self.draft_mut() {
                    draft.saving = false;
                }
            }
        }
    }
}
