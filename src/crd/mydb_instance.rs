//! MydbDBaaSInstance Custom Resource Definition

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const PHASE_PENDING: &str = "Pending";
pub const PHASE_CREATING: &str = "Creating";
pub const PHASE_UPDATING: &str = "Updating";
pub const PHASE_DELETING: &str = "Deleting";
pub const PHASE_DELETED: &str = "Deleted";
pub const PHASE_READY: &str = "Ready";

/// MydbDBaaSInstance resource specification
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "dbaas.mydb.example.com",
    version = "v1alpha1",
    kind = "MydbDBaaSInstance",
    plural = "mydbdbaasinstances",
    singular = "mydbdbaasinstance",
    namespaced,
    status = "MydbDBaaSInstanceStatus",
    printcolumn = r#"{"name": "Phase", "type": "string", "jsonPath": ".status.phase"}"#,
    printcolumn = r#"{"name": "Instance", "type": "string", "jsonPath": ".status.instanceID"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MydbDBaaSInstanceSpec {
    /// Inventory the instance is provisioned through
    pub inventory_ref: NamespacedName,

    /// Name of the database instance on the provider side
    pub name: String,

    /// Cloud provider hosting the instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,

    /// Cloud region hosting the instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_region: Option<String>,

    /// Provider specific provisioning parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_instance_params: BTreeMap<String, String>,
}

/// Reference to a namespaced object
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct NamespacedName {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// MydbDBaaSInstance status
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MydbDBaaSInstanceStatus {
    /// Current phase (Pending, Creating, Updating, Deleting, Deleted, Ready)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    /// Provider side instance identifier
    #[serde(rename = "instanceID", skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    /// Provider specific instance details
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub instance_info: BTreeMap<String, String>,

    /// Status conditions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// Status condition
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type
    #[serde(rename = "type")]
    pub type_: String,

    /// Status (True, False, Unknown)
    pub status: String,

    /// Last transition time
    pub last_transition_time: DateTime<Utc>,

    /// Reason for the condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
