//! HTTP backend consumed by the viewer
//!
//! # Routes
//!
//! ```text
//! GET  /               welcome text
//! GET  /api/hierarchy  subscriptions → resource groups → resources (JSON)
//! PUT  /api/tags       {resourceId, tags} → replace the resource's default tags
//! ```
//!
//! Upstream failures are logged with their classification and answered with a
//! fixed 500 body; clients cannot tell an expired token from a missing resource.

#![warn(clippy::all, rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::api_models::{
    ErrorBody, UpdateTagsRequest, UpdateTagsResponse, HIERARCHY_FAILED, TAGS_UPDATED,
    TAGS_UPDATE_FAILED, WELCOME,
};
use crate::app::azure::{fetch_hierarchy, update_tags, Hierarchy, ManagementApi, UpstreamError};

/// Shared state passed to all request handlers
#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn ManagementApi>,
    fetch_concurrency: usize,
}

impl AppState {
    pub fn new(api: Arc<dyn ManagementApi>, fetch_concurrency: usize) -> Self {
        Self {
            api,
            fetch_concurrency,
        }
    }
}

/// Failures reported at the endpoint boundary
#[derive(Debug)]
pub enum ApiError {
    Hierarchy(UpstreamError),
    UpdateTags(UpstreamError),
    /// The PUT body was not `{resourceId, tags}`
    InvalidTagsBody(String),
}

impl ApiError {
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Hierarchy(_) => HIERARCHY_FAILED,
            ApiError::UpdateTags(_) | ApiError::InvalidTagsBody(_) => TAGS_UPDATE_FAILED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Hierarchy(e) => {
                log_error!("Error fetching Azure hierarchy [{}]: {}", e.kind().short_label(), e);
            }
            ApiError::UpdateTags(e) => {
                log_error!("Error updating tags [{}]: {}", e.kind().short_label(), e);
            }
            ApiError::InvalidTagsBody(reason) => {
                log_warn!("Rejected tag update body: {}", reason);
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.public_message().to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the router with CORS and request tracing applied
pub fn router(state: AppState) -> Router {
    // The viewer may be served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_welcome))
        .route("/api/hierarchy", get(handle_hierarchy))
        .route("/api/tags", put(handle_update_tags))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn handle_welcome() -> &'static str {
    WELCOME
}

async fn handle_hierarchy(State(state): State<AppState>) -> Result<Json<Hierarchy>, ApiError> {
    let hierarchy = fetch_hierarchy(state.api.as_ref(), state.fetch_concurrency)
        .await
        .map_err(ApiError::Hierarchy)?;
    Ok(Json(hierarchy))
}

async fn handle_update_tags(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTagsRequest>, JsonRejection>,
) -> Result<Json<UpdateTagsResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidTagsBody(e.body_text()))?;

    let data = update_tags(state.api.as_ref(), &request.resource_id, &request.tags)
        .await
        .map_err(ApiError::UpdateTags)?;

    Ok(Json(UpdateTagsResponse {
        message: TAGS_UPDATED.to_string(),
        data,
    }))
}

/// A running backend bound to a local port
pub struct ApiServer {
    addr: SocketAddr,
    /// Server shutdown handle
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ApiServer {
    /// Bind `addr` (port 0 picks a free port) and start serving in the background
    pub async fn start(addr: SocketAddr, state: AppState) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let app = router(state);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
        });

        info!("Server running on http://localhost:{}", addr.port());

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.addr.port())
    }

    /// Stop accepting connections; in-flight requests are allowed to finish
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("Server shutdown initiated");
        }
    }

    /// Wait for the serve loop to end
    pub async fn wait(self) -> anyhow::Result<()> {
        match self.task.await {
            Ok(result) => Ok(result?),
            Err(e) => {
                warn!("Server task ended abnormally: {}", e);
                Err(e.into())
            }
        }
    }
}
