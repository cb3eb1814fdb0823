//! Reconcilers for the MyDB DBaaS Operator
//!
//! This module contains the business logic behind the controllers:
//! - Discovering the DBaaSProvider API
//! - Finding a garbage-collection owner for the registration
//! - Building and creating the provider registration

pub mod discovery;
pub mod owners;
pub mod provider_builder;
pub mod registration;
