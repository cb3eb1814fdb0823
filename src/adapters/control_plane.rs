//! Control-plane access used by the provider registration reconciler
//!
//! The reconciler only talks to the API server through [`ControlPlane`], which
//! keeps its decision sequence independent of the transport.

use async_trait::async_trait;
use k8s_openapi::api::{apps::v1::Deployment, rbac::v1::ClusterRole};
use kube::{
    api::{ListParams, PostParams},
    Api, Client,
};
use tracing::debug;

use crate::crd::DBaaSProvider;
use crate::error::{Error, Result};

/// Operations the reconciler issues against the API server
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Fetch a Deployment, `None` when it does not exist
    async fn get_workload(&self, namespace: &str, name: &str) -> Result<Option<Deployment>>;

    /// Kinds served under a group/version, `None` when the group/version is not served
    async fn served_kinds(&self, group_version: &str) -> Result<Option<Vec<String>>>;

    /// Fetch a cluster-scoped DBaaSProvider, `None` when it does not exist
    async fn get_provider(&self, name: &str) -> Result<Option<DBaaSProvider>>;

    /// List ClusterRoles matching a label selector, in API server order
    async fn list_cluster_roles(&self, selector: &str) -> Result<Vec<ClusterRole>>;

    /// Create a DBaaSProvider
    async fn create_provider(&self, provider: &DBaaSProvider) -> Result<DBaaSProvider>;
}

/// [`ControlPlane`] backed by a Kubernetes client
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
}

impl KubeControlPlane {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ControlPlane for KubeControlPlane {
    async fn get_workload(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        Ok(deployments.get_opt(name).await?)
    }

    async fn served_kinds(&self, group_version: &str) -> Result<Option<Vec<String>>> {
        match self.client.list_api_group_resources(group_version).await {
            Ok(list) => Ok(Some(
                list.resources.into_iter().map(|resource| resource.kind).collect(),
            )),
            Err(kube::Error::Api(response)) if response.code == 404 => {
                debug!(group_version, "API group version not served");
                Ok(None)
            }
            Err(e) => Err(Error::Kube(e)),
        }
    }

    async fn get_provider(&self, name: &str) -> Result<Option<DBaaSProvider>> {
        let providers: Api<DBaaSProvider> = Api::all(self.client.clone());
        Ok(providers.get_opt(name).await?)
    }

    async fn list_cluster_roles(&self, selector: &str) -> Result<Vec<ClusterRole>> {
        let roles: Api<ClusterRole> = Api::all(self.client.clone());
        let list = roles.list(&ListParams::default().labels(selector)).await?;
        Ok(list.items)
    }

    async fn create_provider(&self, provider: &DBaaSProvider) -> Result<DBaaSProvider> {
        let providers: Api<DBaaSProvider> = Api::all(self.client.clone());
        Ok(providers.create(&PostParams::default(), provider).await?)
    }
}
