//! aztags - Azure Resource Tag Browser
//!
//! aztags is a two-tier tool for browsing an Azure tenant as a hierarchy of
//! subscriptions, resource groups and resources, and for editing the metadata
//! tags attached to each resource.
//!
//! # Core Features
//!
//! - **Hierarchy API**: A small HTTP backend that walks the Azure Resource Manager
//!   REST API and returns the whole tenant as one nested JSON document
//! - **Tag Updates**: Replace the default tag set of any resource with a single call
//! - **Desktop Viewer**: egui-based viewer with collapsible sections and a tag editor
//!
//! # Architecture Overview
//!
//! - **Azure Layer** ([`app::azure`]): upstream client, hierarchy assembly, tag updates
//! - **HTTP Layer** ([`app::api_server`]): axum router exposing the backend surface
//! - **UI Layer** ([`app::viewer`]): eframe application, explicit view/draft state machines
//! - **Ambient** ([`app::config`], [`app::logging`]): environment configuration and tracing setup
//!
//! ## Key Architectural Patterns
//!
//! - **Trait seam for the upstream**: [`app::azure::ManagementApi`] lets the
//!   hierarchy fetcher run against the real client or a test double
//! - **All-or-nothing fetches**: any failed upstream call fails the whole hierarchy
//! - **Channel-driven UI**: background requests report back to the UI thread over a channel
//!
//! # Binaries
//!
//! - `aztags-server` serves `GET /api/hierarchy`, `PUT /api/tags` and `GET /`
//! - `aztags` is the desktop viewer that talks to the server

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
pub use app::viewer::ViewerApp;
