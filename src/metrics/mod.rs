//! Prometheus metrics for the MyDB DBaaS Operator
//!
//! This module exposes metrics for monitoring operator health and reconciliation.

mod prometheus;

pub use self::prometheus::*;
