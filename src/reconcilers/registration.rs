//! Provider registration reconciler
//!
//! Ensures exactly one `DBaaSProvider` named [`PROVIDER_NAME`] exists once the
//! operator Deployment is running and the DBaaS operator serves the
//! DBaaSProvider API. Every decision is derived from fresh API reads; nothing
//! is remembered between invocations. At most one write is issued.

use std::fmt;

use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;
use tracing::{info, warn};

use crate::adapters::ControlPlane;
use crate::config::OperatorConfig;
use crate::error::{Error, Step};
use crate::reconcilers::discovery::{self, DBAAS_PROVIDER};
use crate::reconcilers::owners;
use crate::reconcilers::provider_builder::{build_provider, PROVIDER_NAME};

/// Identity of the operator Deployment that triggered reconciliation
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkloadRef {
    pub namespace: String,
    pub name: String,
}

impl WorkloadRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Identity of a Deployment, defaulting to the install namespace
    pub fn from_deployment(deployment: &Deployment, config: &OperatorConfig) -> Self {
        let namespace = deployment
            .namespace()
            .unwrap_or_else(|| config.install_namespace.clone());
        Self::new(namespace, deployment.name_any())
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Terminal result of one reconciliation
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to do: the Deployment is gone or the registration already exists
    NoOp,
    /// The registration was created
    Created { name: String },
    /// The DBaaSProvider API is not served yet; retry with backoff
    RequeueRequested,
    /// A transient API failure
    Retryable(Error),
    /// Misconfigured installation that retrying alone will not fix
    Fatal(Error),
}

impl Outcome {
    /// Whether this reconciliation wrote to the API server
    pub fn performed_write(&self) -> bool {
        matches!(self, Outcome::Created { .. })
    }

    /// Metric label of the outcome
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NoOp => "noop",
            Outcome::Created { .. } => "created",
            Outcome::RequeueRequested => "requeue",
            Outcome::Retryable(_) => "retryable_error",
            Outcome::Fatal(_) => "fatal_error",
        }
    }
}

/// Reconcile the provider registration for the given operator Deployment
pub async fn reconcile<C>(control_plane: &C, config: &OperatorConfig, workload: &WorkloadRef) -> Outcome
where
    C: ControlPlane + ?Sized,
{
    match control_plane
        .get_workload(&workload.namespace, &workload.name)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            info!(workload = %workload, "Deployment not found, could be deleted, nothing to do");
            return Outcome::NoOp;
        }
        Err(e) => return Outcome::Retryable(e.at(Step::FetchWorkload)),
    }

    match discovery::is_registered(control_plane, &DBAAS_PROVIDER).await {
        Ok(true) => {}
        Ok(false) => {
            info!(
                group_version = DBAAS_PROVIDER.group_version,
                kind = DBAAS_PROVIDER.kind,
                "DBaaSProvider API not served yet, requeuing with backoff"
            );
            return Outcome::RequeueRequested;
        }
        Err(e) => return Outcome::Retryable(e.at(Step::DiscoverCapability)),
    }

    match control_plane.get_provider(PROVIDER_NAME).await {
        Ok(Some(_)) => return Outcome::NoOp,
        Ok(None) => info!(name = PROVIDER_NAME, "Provider registration not found, creating"),
        Err(e) => return Outcome::Retryable(e.at(Step::FetchProvider)),
    }

    let candidates = match owners::candidates(control_plane, config).await {
        Ok(candidates) => candidates,
        Err(e) => return Outcome::Retryable(e.at(Step::ListOwners)),
    };
    let Some(owner) = candidates.first() else {
        let err = Error::NoOwnerCandidates {
            selector: config.owner_selector(),
        };
        warn!(error = %err, "Could not find ClusterRole owned by the CSV to inherit the registration");
        return Outcome::Fatal(err.at(Step::ListOwners));
    };
    if candidates.len() > 1 {
        warn!(
            count = candidates.len(),
            owner = %owner.name_any(),
            "Several ClusterRoles match the installation, using the first returned"
        );
    }

    let provider = match build_provider(owner) {
        Ok(provider) => provider,
        Err(e) => {
            warn!(error = %e, "Owner ClusterRole cannot be referenced");
            return Outcome::Fatal(e.at(Step::BuildProvider));
        }
    };
    match control_plane.create_provider(&provider).await {
        Ok(created) => {
            let name = created.name_any();
            info!(name = %name, owner = %owner.name_any(), "Provider registration created");
            Outcome::Created { name }
        }
        Err(e) => {
            if e.has_status(409) {
                warn!(name = PROVIDER_NAME, "Provider registration created concurrently, will retry");
            }
            Outcome::Retryable(e.at(Step::CreateProvider))
        }
    }
}
