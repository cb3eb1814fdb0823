//! Adapters between the reconcilers and the Kubernetes API

mod control_plane;

pub use control_plane::*;
