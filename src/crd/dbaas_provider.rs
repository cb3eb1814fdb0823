//! DBaaSProvider Custom Resource
//!
//! The provider registration type served by the DBaaS operator. Its CRD is
//! installed by the DBaaS operator, so it is only declared here to read and
//! create instances, never generated.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// DBaaSProvider resource specification
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "dbaas.redhat.com",
    version = "v1alpha1",
    kind = "DBaaSProvider",
    plural = "dbaasproviders",
    singular = "dbaasprovider"
)]
#[serde(rename_all = "camelCase")]
pub struct DBaaSProviderSpec {
    /// Metadata shown to users for this provider
    pub provider: DatabaseProvider,

    /// Kind of the provider's inventory resource
    pub inventory_kind: String,

    /// Kind of the provider's connection resource
    pub connection_kind: String,

    /// Kind of the provider's instance resource
    pub instance_kind: String,

    /// Credential fields a user supplies to create an inventory
    #[serde(default)]
    pub credential_fields: Vec<CredentialField>,

    /// Whether the provider offers a free trial
    #[serde(default)]
    pub allows_free_trial: bool,

    /// Documentation link for provisioning outside the cluster
    #[serde(rename = "externalProvisionURL")]
    pub external_provision_url: String,

    /// Description shown next to the provisioning link
    pub external_provision_description: String,

    /// Parameters accepted when provisioning an instance
    #[serde(default)]
    pub instance_parameter_specs: Vec<InstanceParameterSpec>,
}

/// Display metadata of a database provider
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProvider {
    pub name: String,
    pub display_name: String,
    pub display_description: String,
    pub icon: ProviderIcon,
}

/// Provider icon, base64 encoded
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ProviderIcon {
    #[serde(rename = "base64data")]
    pub data: String,
    #[serde(rename = "mediatype")]
    pub media_type: String,
}

/// A credential a user must provide
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialField {
    /// Key of the field in the credentials secret
    pub key: String,

    /// Label shown in the UI
    pub display_name: String,

    /// Field type (string, maskedstring, integer, boolean)
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether the field is mandatory
    pub required: bool,

    /// Additional help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// A provisioning parameter accepted by the provider
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstanceParameterSpec {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}
