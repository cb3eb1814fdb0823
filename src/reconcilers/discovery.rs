//! API discovery for the DBaaSProvider capability

use crate::adapters::ControlPlane;
use crate::error::Result;

/// An API type identified by group/version and kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capability {
    pub group_version: &'static str,
    pub kind: &'static str,
}

/// The DBaaSProvider API served once the DBaaS operator is installed
pub const DBAAS_PROVIDER: Capability = Capability {
    group_version: "dbaas.redhat.com/v1alpha1",
    kind: "DBaaSProvider",
};

/// Check whether the API server currently serves the capability
///
/// A group/version the server does not know about means "not registered".
pub async fn is_registered<C>(control_plane: &C, capability: &Capability) -> Result<bool>
where
    C: ControlPlane + ?Sized,
{
    let registered = control_plane
        .served_kinds(capability.group_version)
        .await?
        .is_some_and(|kinds| kinds.iter().any(|kind| kind == capability.kind));
    Ok(registered)
}
