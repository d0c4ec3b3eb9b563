//! Desktop viewer for the tag hierarchy.
//!
//! The viewer fetches the hierarchy from a running `aztags-server`, renders it
//! as nested collapsible sections and lets the user edit one resource's tags at
//! a time. Saved tags show up after a manual reload; a save never patches the
//! loaded hierarchy in place.

pub mod app;
pub mod client;
pub mod notifications;
pub mod state;
pub mod tag_editor;
pub mod tree;

pub use app::{ViewState, ViewerApp, ViewerEvent};
pub use client::{BackendClient, ViewerError};
pub use state::{parse_tag_input, DraftState, HierarchyState, TagDraft, ValidationError};
