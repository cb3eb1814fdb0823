//! MyDB DBaaS Kubernetes Operator
//!
//! Registers the MyDB Cloud database provider with the DBaaS operator by
//! creating a cluster-scoped `DBaaSProvider` once the operator is running.

pub mod adapters;
pub mod config;
pub mod controllers;
pub mod crd;
pub mod error;
pub mod metrics;
pub mod reconcilers;

pub use config::OperatorConfig;
pub use error::{Error, Result};
