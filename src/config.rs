//! Process-wide operator configuration
//!
//! Read once at startup from the environment set on the controller-manager
//! Deployment and by OLM, then shared read-only for the life of the process.

use std::collections::{BTreeMap, HashMap};

use envconfig::Envconfig;

use crate::error::{Error, Result};

/// Label OLM sets to the owning ClusterServiceVersion name
pub const OLM_OWNER_LABEL: &str = "olm.owner";
/// Label OLM sets to the owning object's kind
pub const OLM_OWNER_KIND_LABEL: &str = "olm.owner.kind";
/// Owner kind of everything OLM provisions for an installation
pub const OLM_OWNER_KIND: &str = "ClusterServiceVersion";

#[derive(Envconfig, Clone, Debug, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Namespace the operator is installed into
    #[envconfig(from = "INSTALL_NAMESPACE")]
    pub install_namespace: String,

    /// Name and version of the installing ClusterServiceVersion
    #[envconfig(from = "OPERATOR_CONDITION_NAME")]
    pub operator_name_version: String,

    #[envconfig(from = "METRICS_PORT", default = "8080")]
    pub metrics_port: u16,
}

impl OperatorConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::init_from_env()
            .map_err(|e| Error::config(e.to_string()))?
            .validated()
    }

    /// Load the configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        Self::init_from_hashmap(vars)
            .map_err(|e| Error::config(e.to_string()))?
            .validated()
    }

    fn validated(self) -> Result<Self> {
        if self.install_namespace.trim().is_empty() {
            return Err(Error::config("INSTALL_NAMESPACE must be set"));
        }
        if self.operator_name_version.trim().is_empty() {
            return Err(Error::config("OPERATOR_CONDITION_NAME must be set"));
        }
        Ok(self)
    }

    /// Labels OLM puts on every object it provisions for this installation
    pub fn owner_labels(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            (OLM_OWNER_LABEL, self.operator_name_version.as_str()),
            (OLM_OWNER_KIND_LABEL, OLM_OWNER_KIND),
        ])
    }

    /// Exact-match label selector for objects provisioned by this installation
    pub fn owner_selector(&self) -> String {
        self.owner_labels()
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}
