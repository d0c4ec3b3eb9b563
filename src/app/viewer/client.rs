//! HTTP client for the aztags backend.

use thiserror::Error;

use crate::app::api_models::{UpdateTagsRequest, UpdateTagsResponse};
use crate::app::azure::Hierarchy;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_hierarchy(&self) -> Result<Hierarchy, ViewerError> {
        let url = format!("{}/api/hierarchy", self.base_url);
        tracing::debug!("Fetching hierarchy from {}", url);
        let response = check_status(self.http.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn update_tags(
        &self,
        request: &UpdateTagsRequest,
    ) -> Result<UpdateTagsResponse, ViewerError> {
        let url = format!("{}/api/tags", self.base_url);
        tracing::debug!("Saving {} tags for {}", request.tags.len(), request.resource_id);
        let response = check_status(self.http.put(&url).json(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ViewerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ViewerError::Status { status, body })
}
