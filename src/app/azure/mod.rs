//! Azure Resource Manager integration.

pub mod client;
pub mod errors;
pub mod hierarchy;
pub mod models;
pub mod tags;

pub use client::{AzureManagementClient, ManagementApi, API_VERSION, DEFAULT_MANAGEMENT_ENDPOINT};
pub use errors::{UpstreamError, UpstreamErrorKind};
pub use hierarchy::{fetch_hierarchy, DEFAULT_FETCH_CONCURRENCY};
pub use models::{Account, Hierarchy, Resource, ResourceGroup, TagMap};
pub use tags::update_tags;
