//! Owner discovery for the provider registration
//!
//! The registration is cluster-scoped, so it cannot be owned by the operator's
//! namespaced Deployment. OLM provisions ClusterRoles for the installation and
//! removes them on uninstall, which makes them suitable garbage-collection owners.

use k8s_openapi::api::rbac::v1::ClusterRole;
use tracing::debug;

use crate::adapters::ControlPlane;
use crate::config::OperatorConfig;
use crate::error::Result;

/// List the ClusterRoles provisioned by this installation
///
/// Order is whatever the API server returns; an empty list is not an error here.
pub async fn candidates<C>(control_plane: &C, config: &OperatorConfig) -> Result<Vec<ClusterRole>>
where
    C: ControlPlane + ?Sized,
{
    let selector = config.owner_selector();
    let roles = control_plane.list_cluster_roles(&selector).await?;
    debug!(selector = %selector, count = roles.len(), "Listed potential owner ClusterRoles");
    Ok(roles)
}
