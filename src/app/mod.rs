//! Core application modules for aztags.
//!
//! # Module Organization
//!
//! ## Azure Integration
//! - [`azure`] - Resource Manager client, hierarchy assembly and tag updates
//!
//! ## Backend
//! - [`api_server`] - axum HTTP surface consumed by the viewer
//! - [`api_models`] - request and response bodies shared by server and viewer
//!
//! ## Frontend
//! - [`viewer`] - egui desktop viewer with the tag editor
//!
//! ## Infrastructure
//! - [`config`] - environment-driven configuration for both binaries
//! - [`logging`] - tracing subscriber setup and crash reporting

pub mod api_models;
pub mod api_server;
pub mod azure;
pub mod config;
pub mod logging;
pub mod viewer;

pub use viewer::ViewerApp;
