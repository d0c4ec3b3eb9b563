//! Subscription → resource group → resource hierarchy assembly.
//!
//! One list call for subscriptions, one per subscription for its groups and one
//! per group for its resources: `1 + A + A·G` calls for a tenant with `A`
//! subscriptions of `G` groups each.
//!
//! `concurrency` bounds how many sibling fetches are in flight at each level. The
//! default of 1 is strictly sequential. Output order always follows upstream
//! order, and the first failure at any level fails the whole fetch; a partial
//! hierarchy is never returned.

use futures::{stream, StreamExt, TryStreamExt};
use std::time::Instant;

use super::client::ManagementApi;
use super::errors::UpstreamError;
use super::models::{Account, Hierarchy, RawResourceGroup, RawSubscription, Resource, ResourceGroup};

pub const DEFAULT_FETCH_CONCURRENCY: usize = 1;

pub async fn fetch_hierarchy(
    api: &dyn ManagementApi,
    concurrency: usize,
) -> Result<Hierarchy, UpstreamError> {
    let limit = concurrency.max(1);
    let started = Instant::now();

    let subscriptions = api.list_subscriptions().await?;
    log_debug!("Found {} subscriptions", subscriptions.len());

    let hierarchy: Hierarchy = stream::iter(subscriptions)
        .map(|subscription| fetch_account(api, subscription, limit))
        .buffered(limit)
        .try_collect()
        .await?;

    let resource_total: usize = hierarchy.iter().map(Account::resource_count).sum();
    log_info!(
        "Fetched hierarchy: {} accounts, {} resources in {:?}",
        hierarchy.len(),
        resource_total,
        started.elapsed()
    );

    Ok(hierarchy)
}

async fn fetch_account(
    api: &dyn ManagementApi,
    subscription: RawSubscription,
    limit: usize,
) -> Result<Account, UpstreamError> {
    let subscription_id = subscription.subscription_id;
    let groups = api.list_resource_groups(&subscription_id).await?;
    log_debug!(
        "Subscription {} has {} resource groups",
        subscription_id,
        groups.len()
    );

    let resource_groups: Vec<ResourceGroup> = stream::iter(groups)
        .map(|group| fetch_group(api, &subscription_id, group))
        .buffered(limit)
        .try_collect()
        .await?;

    Ok(Account {
        subscription_id,
        display_name: subscription.display_name,
        resource_groups,
    })
}

async fn fetch_group(
    api: &dyn ManagementApi,
    subscription_id: &str,
    group: RawResourceGroup,
) -> Result<ResourceGroup, UpstreamError> {
    let resources = api
        .list_resources(subscription_id, &group.name)
        .await?
        .into_iter()
        .map(Resource::from)
        .collect();

    Ok(ResourceGroup {
        name: group.name,
        resources,
    })
}
