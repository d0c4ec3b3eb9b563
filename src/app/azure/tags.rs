use super::client::ManagementApi;
use super::errors::UpstreamError;
use super::models::TagMap;

/// Replace the full default tag set of `resource_id` with `tags`.
///
/// The provider overwrites rather than merges, so callers send the complete
/// mapping they want the resource to end up with. Exactly one PUT is issued.
pub async fn update_tags(
    api: &dyn ManagementApi,
    resource_id: &str,
    tags: &TagMap,
) -> Result<serde_json::Value, UpstreamError> {
    let response = api.put_default_tags(resource_id, tags).await?;
    log_info!("Updated {} tags on {}", tags.len(), resource_id);
    Ok(response)
}
