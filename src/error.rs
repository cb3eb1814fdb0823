//! Error types for the MyDB DBaaS Operator

use std::fmt;

use thiserror::Error;

/// Result type alias using the operator's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Operator error types
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No ClusterRole carries the installation's OLM owner labels
    #[error("No ClusterRole matching '{selector}' found to own the provider registration")]
    NoOwnerCandidates { selector: String },

    /// The chosen owner ClusterRole has no uid to reference
    #[error("ClusterRole '{name}' has no uid and cannot own the provider registration")]
    OwnerWithoutUid { name: String },

    /// A reconciliation step failed
    #[error("{step} failed: {source}")]
    Reconcile {
        step: Step,
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Attach the reconciliation step that produced this error
    pub fn at(self, step: Step) -> Self {
        Error::Reconcile {
            step,
            source: Box::new(self),
        }
    }

    /// Whether retrying without operator intervention cannot succeed
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::Config(_) | Error::NoOwnerCandidates { .. } | Error::OwnerWithoutUid { .. } => {
                true
            }
            Error::Reconcile { source, .. } => source.is_fatal(),
            _ => false,
        }
    }

    /// Whether the API server rejected the request with the given HTTP status
    pub fn has_status(&self, code: u16) -> bool {
        match self {
            Error::Kube(kube::Error::Api(response)) => response.code == code,
            Error::Reconcile { source, .. } => source.has_status(code),
            _ => false,
        }
    }
}

/// Steps of the provider registration reconciliation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    FetchWorkload,
    DiscoverCapability,
    FetchProvider,
    ListOwners,
    BuildProvider,
    CreateProvider,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            Step::FetchWorkload => "fetching operator Deployment",
            Step::DiscoverCapability => "discovering DBaaSProvider API",
            Step::FetchProvider => "fetching provider registration",
            Step::ListOwners => "listing owner ClusterRoles",
            Step::BuildProvider => "building provider registration",
            Step::CreateProvider => "creating provider registration",
        };
        f.write_str(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> Error {
        Error::Kube(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "rejected".to_string(),
            reason: "Conflict".to_string(),
            code,
        }))
    }

    #[test]
    fn step_context_is_rendered() {
        let err = api_error(500).at(Step::CreateProvider);
        assert!(err.to_string().starts_with("creating provider registration failed"));
    }

    #[test]
    fn fatal_survives_step_wrapping() {
        let err = Error::NoOwnerCandidates {
            selector: "olm.owner=x".to_string(),
        }
        .at(Step::ListOwners);
        assert!(err.is_fatal());
        assert!(!api_error(500).at(Step::ListOwners).is_fatal());
    }

    #[test]
    fn status_code_is_visible_through_wrapping() {
        assert!(api_error(409).at(Step::CreateProvider).has_status(409));
        assert!(!api_error(500).has_status(409));
    }
}
