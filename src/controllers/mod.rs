//! Kubernetes controllers for the MyDB DBaaS Operator
//!
//! This module contains the controller that watches the operator Deployment,
//! decides which notifications to act on, and drives reconciliation.

pub mod admission;
mod backoff;
pub mod notification;
mod registration_controller;

pub use backoff::{RequeueBackoff, BACKOFF_BASE, BACKOFF_MAX};
pub use registration_controller::run as run_registration_controller;

use kube::Client;

use crate::adapters::KubeControlPlane;
use crate::config::OperatorConfig;

/// Shared context for all controllers
pub struct Context {
    /// API access for the reconcilers
    pub control_plane: KubeControlPlane,
    /// Process-wide configuration
    pub config: OperatorConfig,
    /// Requeue backoff while the DBaaS API is missing
    pub backoff: RequeueBackoff,
}

impl Context {
    /// Create a new context
    pub fn new(client: Client, config: OperatorConfig) -> Self {
        Self {
            control_plane: KubeControlPlane::new(client),
            config,
            backoff: RequeueBackoff::default(),
        }
    }
}
