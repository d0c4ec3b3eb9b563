//! Azure Resource Manager REST client.
//!
//! Four operations are used: list subscriptions, list resource groups, list
//! resources in a group and PUT the default tag set of a resource. All calls
//! carry the fixed [`API_VERSION`] query parameter and, when configured, a
//! bearer token. No retries, no timeouts, no pagination (`nextLink` is ignored).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use super::errors::UpstreamError;
use super::models::{
    ListResponse, RawResource, RawResourceGroup, RawSubscription, TagMap, TagsResourceBody,
};

pub const API_VERSION: &str = "2021-04-01";
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Characters escaped when a value from upstream data becomes a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The slice of the management API this tool needs.
///
/// The hierarchy fetcher and tag updater only talk to this trait, so tests can
/// substitute a scripted implementation.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn list_subscriptions(&self) -> Result<Vec<RawSubscription>, UpstreamError>;

    async fn list_resource_groups(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<RawResourceGroup>, UpstreamError>;

    async fn list_resources(
        &self,
        subscription_id: &str,
        resource_group: &str,
    ) -> Result<Vec<RawResource>, UpstreamError>;

    /// Replace (not merge) the default tag set; returns the provider's response body
    async fn put_default_tags(
        &self,
        resource_id: &str,
        tags: &TagMap,
    ) -> Result<serde_json::Value, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct AzureManagementClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl AzureManagementClient {
    pub fn new(endpoint: &str, access_token: Option<String>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("aztags/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, UpstreamError> {
        let url = self.url(path);
        log_debug!("GET {}", url);

        let response = self
            .authorize(self.http.get(&url))
            .query(&[("api-version", API_VERSION)])
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.clone(),
                source,
            })?;

        let body = read_success_body(&url, response).await?;
        let list: ListResponse<T> =
            serde_json::from_str(&body).map_err(|source| UpstreamError::Decode {
                url: url.clone(),
                source,
            })?;
        Ok(list.value)
    }
}

#[async_trait]
impl ManagementApi for AzureManagementClient {
    async fn list_subscriptions(&self) -> Result<Vec<RawSubscription>, UpstreamError> {
        self.get_list(&subscriptions_path()).await
    }

    async fn list_resource_groups(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<RawResourceGroup>, UpstreamError> {
        self.get_list(&resource_groups_path(subscription_id)).await
    }

    async fn list_resources(
        &self,
        subscription_id: &str,
        resource_group: &str,
    ) -> Result<Vec<RawResource>, UpstreamError> {
        self.get_list(&resources_path(subscription_id, resource_group))
            .await
    }

    async fn put_default_tags(
        &self,
        resource_id: &str,
        tags: &TagMap,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = self.url(&default_tags_path(resource_id));
        log_debug!("PUT {} ({} tags)", url, tags.len());

        let response = self
            .authorize(self.http.put(&url))
            .query(&[("api-version", API_VERSION)])
            .json(&TagsResourceBody::new(tags))
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.clone(),
                source,
            })?;

        let body = read_success_body(&url, response).await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|source| UpstreamError::Decode { url, source })
    }
}

async fn read_success_body(url: &str, response: reqwest::Response) -> Result<String, UpstreamError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        })?;

    if !status.is_success() {
        return Err(UpstreamError::status(url, status, body));
    }
    Ok(body)
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

pub fn subscriptions_path() -> String {
    "/subscriptions".to_string()
}

pub fn resource_groups_path(subscription_id: &str) -> String {
    format!("/subscriptions/{}/resourcegroups", encode_segment(subscription_id))
}

pub fn resources_path(subscription_id: &str, resource_group: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/resources",
        encode_segment(subscription_id),
        encode_segment(resource_group)
    )
}

/// Tag endpoint for a resource id; the id is already a path and is used verbatim.
pub fn default_tags_path(resource_id: &str) -> String {
    let resource_id = resource_id.trim_end_matches('/');
    if resource_id.starts_with('/') {
        format!("{}/providers/Microsoft.Resources/tags/default", resource_id)
    } else {
        format!("/{}/providers/Microsoft.Resources/tags/default", resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_paths() {
        assert_eq!(subscriptions_path(), "/subscriptions");
        assert_eq!(resource_groups_path("sub-1"), "/subscriptions/sub-1/resourcegroups");
        assert_eq!(
            resources_path("sub-1", "rg-web"),
            "/subscriptions/sub-1/resourceGroups/rg-web/resources"
        );
    }

    #[test]
    fn test_group_name_is_percent_encoded() {
        assert_eq!(
            resources_path("sub-1", "my group#1"),
            "/subscriptions/sub-1/resourceGroups/my%20group%231/resources"
        );
    }

    #[test]
    fn test_default_tags_path() {
        assert_eq!(
            default_tags_path("/sub1/rg1/res1"),
            "/sub1/rg1/res1/providers/Microsoft.Resources/tags/default"
        );
        assert_eq!(
            default_tags_path("sub1/rg1/res1/"),
            "/sub1/rg1/res1/providers/Microsoft.Resources/tags/default"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = AzureManagementClient::new("http://127.0.0.1:9/", None).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9");
        assert_eq!(client.url("/subscriptions"), "http://127.0.0.1:9/subscriptions");
    }
}
