//! Admission filter for watch notifications
//!
//! Registration only needs to run once the operator Deployment appears, so
//! every notification other than a creation is dropped before it is queued.

use kube::ResourceExt;

use crate::config::{OperatorConfig, OLM_OWNER_KIND, OLM_OWNER_KIND_LABEL, OLM_OWNER_LABEL};
use crate::controllers::notification::Notification;

/// Decides which notifications enqueue a reconciliation
#[derive(Clone, Debug)]
pub struct AdmissionFilter {
    installation: Option<OperatorConfig>,
}

impl AdmissionFilter {
    /// Admit every creation
    pub fn creations() -> Self {
        Self { installation: None }
    }

    /// Admit creations of objects provisioned by this installation only
    pub fn installation(config: OperatorConfig) -> Self {
        Self {
            installation: Some(config),
        }
    }

    pub fn admit<K: ResourceExt>(&self, notification: &Notification<K>) -> bool {
        match notification {
            Notification::Create(obj) => self
                .installation
                .as_ref()
                .map_or(true, |config| belongs_to_installation(obj, config)),
            Notification::Update(_) | Notification::Delete(_) | Notification::Generic(_) => false,
        }
    }
}

/// Whether an object lives in the install namespace and carries the
/// installation's OLM owner labels
pub fn belongs_to_installation<K: ResourceExt>(obj: &K, config: &OperatorConfig) -> bool {
    if obj.namespace().as_deref() != Some(config.install_namespace.as_str()) {
        return false;
    }
    let labels = obj.labels();
    labels.get(OLM_OWNER_KIND_LABEL).map(String::as_str) == Some(OLM_OWNER_KIND)
        && labels.get(OLM_OWNER_LABEL) == Some(&config.operator_name_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn config() -> OperatorConfig {
        OperatorConfig {
            install_namespace: "mydb-system".to_string(),
            operator_name_version: "mydb-operator.v0.1.0".to_string(),
            metrics_port: 8080,
        }
    }

    fn deployment(namespace: &str, labels: &[(&str, &str)]) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some("mydb-controller-manager".to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(
                    labels
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<BTreeMap<_, _>>(),
                ),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn owned() -> Deployment {
        deployment(
            "mydb-system",
            &[
                ("olm.owner", "mydb-operator.v0.1.0"),
                ("olm.owner.kind", "ClusterServiceVersion"),
            ],
        )
    }

    #[test]
    fn only_creations_are_admitted() {
        let filter = AdmissionFilter::creations();
        let dep = deployment("anywhere", &[]);

        assert!(filter.admit(&Notification::Create(dep.clone())));
        assert!(!filter.admit(&Notification::Update(dep.clone())));
        assert!(!filter.admit(&Notification::Delete(dep.clone())));
        assert!(!filter.admit(&Notification::Generic(dep)));
    }

    #[test]
    fn installation_filter_admits_owned_creation() {
        let filter = AdmissionFilter::installation(config());

        assert!(filter.admit(&Notification::Create(owned())));
        assert!(!filter.admit(&Notification::Update(owned())));
        assert!(!filter.admit(&Notification::Delete(owned())));
        assert!(!filter.admit(&Notification::Generic(owned())));
    }

    #[test]
    fn other_namespace_is_rejected() {
        let mut dep = owned();
        dep.metadata.namespace = Some("default".to_string());
        assert!(!belongs_to_installation(&dep, &config()));
    }

    #[test]
    fn other_installation_is_rejected() {
        let dep = deployment(
            "mydb-system",
            &[
                ("olm.owner", "mydb-operator.v0.0.9"),
                ("olm.owner.kind", "ClusterServiceVersion"),
            ],
        );
        assert!(!belongs_to_installation(&dep, &config()));
    }

    #[test]
    fn non_csv_owner_kind_is_rejected() {
        let dep = deployment(
            "mydb-system",
            &[
                ("olm.owner", "mydb-operator.v0.1.0"),
                ("olm.owner.kind", "Subscription"),
            ],
        );
        assert!(!belongs_to_installation(&dep, &config()));
        assert!(!belongs_to_installation(&deployment("mydb-system", &[]), &config()));
    }
}
