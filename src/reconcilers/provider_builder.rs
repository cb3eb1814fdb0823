//! Builds the MyDB Cloud provider registration

use std::collections::BTreeMap;

use k8s_openapi::api::rbac::v1::ClusterRole;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;

use crate::crd::{
    CredentialField, DBaaSProvider, DBaaSProviderSpec, DatabaseProvider, ProviderIcon,
};
use crate::error::{Error, Result};

/// Well-known name of the cluster-scoped provider registration
pub const PROVIDER_NAME: &str = "mydb-cloud-registration";

const PROVISION_DOC_URL: &str = "https://www.cockroachlabs.com/docs/cockroachcloud/quickstart.html";
const PROVISION_DESCRIPTION: &str =
    "Follow the guide to start a free CockroachDB Serverless (beta) cluster";
const SECRET_KEY_DISPLAY_NAME: &str = "API Secret Key";

const ICON_MEDIA_TYPE: &str = "image/png";
const ICON_DATA: &str = "iVBORw0KGgoAAAANSUhEUgAAACAAAAAgCAYAAABzenr0AAAAGXRFWHRTb2Z0d2FyZQBBZG9iZSBJbWFnZVJlYWR5ccllPAAAA/xJREFUeNq0V9uLE1cY/85k08wk2TWyf8AGH30oI8kigrLxgsULbqC1PrR0Z3rRQh928yD2ySUKgvhg9lFFZ1ZhZR+kkdaCgiUrBSm7YYc+9KmF2AfBBzF46V6SOcfvTM7kvu5kM/1gcgIz53y/7/fdzkegSQK77y4roKhhJkMEFAgzfPgKcjnCFAv/LyhMzt8pRizoIkezq2o1wtKVQTpWGWRqJcpiuML6IAW+8qcaZda/Q8O73D0DrUeQEv6o7QcTgBguKf4QINNnkrZFw2TmxhPJ5O9PnlnXUNlkhTIVNhMGpbazGxLcPR+v/HGq1L5n/+jfqsKQGZDHkZW0QmSwIwCotFDZRvmaciyMOk8eGbiPq/X7l9EOpkbKL+PPYsOlrgC8yNeJtVhQCk7ZYZh2aUWFgNRnqwrL/XxJLvdyntQrgFvFEFcw0uXVSK/KtwRgIrFioB81hz4KGSAs47hWAu3Y+VXjfwXwefLVFANWU26Dbv4ayM3NBXOoXBcO1T65vDLVy5meY+B48rkqQ2iZp6YMH2WuFwdyze/Hz65OVcNw1Uk1he367Yew5SsDFJhRyyJWaFfO5f4VmTNRcL4JMMNXFxxI/oO013KcEjqzYYpLbEbwqu67/VbzDQAlbLJRR1j5Aw61GmBg0hcAe0b/Ul3rPUi86WR1z703at8A0OJ0S79ggQ0tIzaZbHUJpPsGgME3VgMCZo1lkj6dqHb4d/zsmoZ1wVVoCgBjfjDAmxDYYGclIE70EyIZ3+2ldRCffb/OlRuiPuToAGRFTKQ2O3/Aa7o8WhrhDSSDlZB3Ro0FwNCO2LA2jH2AirRjYD48pziVce/c2/7T8OPRYkrQX+9es0VFR8tqFCMI9LshyrL54IKsN5ir7Uk8ep3qOw3RDS0t+tqipDenHCov/HQ1pLelZMmPNCyLwOtIJxpg2QYA0lGcCKtfbMpbBvDnYsJquhG1tuXHgbz7f/5WMN9lu7OneHjI6tcFjgWHk8+8FiMYu/nOk/WeAGDqFYQbUl4BYNCkRBEp9A0AFS8IIBOeezyFCREHC34AyLuBmE6+iG/2/aGZ/+JuACKQfN8Ani7uLKFys/axNL0pYBumxWo+/XSw1DcA5yMmzQoA2hfJNxvGwpGLKylMSU3QP+vbfeDx0o5CnQUmGd8mKh1peeLcaqxeFdH6J19FC74BENbzGl9GIHEJm1GXVmyg1XHMgDKykPH9UsrlVPKVGmKhZT4ZUQXM9W1Mc2a/IWrizMfHM+dC+vBHxfJuWA8yv7TdQiZ0dw5oKrvunKD3onxLg4lZlE1CiN5S5TjtOCf8clE2ez2v59nQlW8O2mo1zIwqDqm46tgPrK2c816AAQCBW4SEJD8W2QAAAABJRU5ErkJggg==";

/// Labels marking the registration's provenance
pub fn provider_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("related-to".to_string(), "dbaas-operator".to_string()),
        ("type".to_string(), "dbaas-provider-registration".to_string()),
    ])
}

/// Controlling owner reference to a ClusterRole
///
/// Deletion of the ClusterRole is never blocked on the registration.
/// The API server rejects owner references without a uid, so one is required.
pub fn owner_reference(owner: &ClusterRole) -> Result<OwnerReference> {
    let uid = owner.uid().filter(|uid| !uid.is_empty()).ok_or_else(|| {
        Error::OwnerWithoutUid {
            name: owner.name_any(),
        }
    })?;
    Ok(OwnerReference {
        api_version: <ClusterRole as k8s_openapi::Resource>::API_VERSION.to_string(),
        kind: <ClusterRole as k8s_openapi::Resource>::KIND.to_string(),
        name: owner.name_any(),
        uid,
        controller: Some(true),
        block_owner_deletion: Some(false),
    })
}

/// Provider registration spec for MyDB Cloud
pub fn provider_spec() -> DBaaSProviderSpec {
    DBaaSProviderSpec {
        provider: DatabaseProvider {
            name: "MyDB".to_string(),
            display_name: "MyDB Cloud".to_string(),
            display_description: "A distributed SQL database as example".to_string(),
            icon: ProviderIcon {
                data: ICON_DATA.to_string(),
                media_type: ICON_MEDIA_TYPE.to_string(),
            },
        },
        inventory_kind: "MydbDBaaSInventory".to_string(),
        connection_kind: "MydbDBaaSConnection".to_string(),
        instance_kind: "MydbDBaaSInstance".to_string(),
        credential_fields: vec![CredentialField {
            key: "apikey".to_string(),
            display_name: SECRET_KEY_DISPLAY_NAME.to_string(),
            field_type: "maskedstring".to_string(),
            required: true,
            help_text: None,
        }],
        allows_free_trial: true,
        external_provision_url: PROVISION_DOC_URL.to_string(),
        external_provision_description: PROVISION_DESCRIPTION.to_string(),
        instance_parameter_specs: Vec::new(),
    }
}

/// Build the provider registration owned by the given ClusterRole
pub fn build_provider(owner: &ClusterRole) -> Result<DBaaSProvider> {
    let mut provider = DBaaSProvider::new(PROVIDER_NAME, provider_spec());
    provider.metadata.owner_references = Some(vec![owner_reference(owner)?]);
    provider.metadata.labels = Some(provider_labels());
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn cluster_role(name: &str, uid: &str) -> ClusterRole {
        ClusterRole {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                uid: Some(uid.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn owner_reference_points_at_cluster_role() {
        let provider = build_provider(&cluster_role("mydb-operator.v0.1.0-abcde", "abc")).unwrap();
        let refs = provider.metadata.owner_references.unwrap();

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].uid, "abc");
        assert_eq!(refs[0].name, "mydb-operator.v0.1.0-abcde");
        assert_eq!(refs[0].api_version, "rbac.authorization.k8s.io/v1");
        assert_eq!(refs[0].kind, "ClusterRole");
        assert_eq!(refs[0].controller, Some(true));
        assert_eq!(refs[0].block_owner_deletion, Some(false));
    }

    #[test]
    fn registration_is_cluster_scoped_with_well_known_name() {
        let provider = build_provider(&cluster_role("owner", "uid-1")).unwrap();

        assert_eq!(provider.metadata.name.as_deref(), Some(PROVIDER_NAME));
        assert!(provider.metadata.namespace.is_none());
        assert_eq!(
            provider.metadata.labels.unwrap().get("type").map(String::as_str),
            Some("dbaas-provider-registration")
        );
    }

    #[test]
    fn payload_is_fixed() {
        let spec = build_provider(&cluster_role("owner", "uid-1")).unwrap().spec;

        assert!(spec.allows_free_trial);
        assert!(spec.instance_parameter_specs.is_empty());
        assert_eq!(spec.instance_kind, "MydbDBaaSInstance");
        assert_eq!(spec.credential_fields.len(), 1);
        assert!(spec.credential_fields[0].required);
        assert_eq!(spec.provider.icon.media_type, "image/png");
        assert!(spec.provider.icon.data.starts_with("iVBORw0KGgo"));
    }

    #[test]
    fn build_is_deterministic() {
        let owner = cluster_role("owner", "uid-1");
        let first = build_provider(&owner).unwrap();
        let second = build_provider(&owner).unwrap();
        assert_eq!(first.spec, second.spec);
        assert_eq!(first.metadata, second.metadata);
    }

    #[test]
    fn owner_without_uid_is_rejected() {
        let mut owner = cluster_role("owner", "");
        let err = build_provider(&owner).unwrap_err();
        assert!(matches!(err, Error::OwnerWithoutUid { ref name } if name == "owner"));
        assert!(err.is_fatal());

        owner.metadata.uid = None;
        assert!(build_provider(&owner).is_err());
    }
}
