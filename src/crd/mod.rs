//! Custom Resource Definitions used by the MyDB DBaaS Operator

mod dbaas_provider;
mod mydb_instance;

pub use dbaas_provider::*;
pub use mydb_instance::*;

use kube::CustomResourceExt;

/// Generate the YAML manifests of the CRDs owned by this operator
///
/// `DBaaSProvider` is excluded: its definition belongs to the DBaaS operator.
pub fn generate_crds() -> Result<Vec<String>, serde_yaml::Error> {
    Ok(vec![serde_yaml::to_string(&MydbDBaaSInstance::crd())?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::Resource;

    #[test]
    fn provider_is_cluster_scoped() {
        let crd = DBaaSProvider::crd();
        assert_eq!(crd.spec.scope, "Cluster");
        assert_eq!(DBaaSProvider::api_version(&()), "dbaas.redhat.com/v1alpha1");
    }

    #[test]
    fn generated_manifests_contain_instance_crd() {
        let crds = generate_crds().unwrap();
        assert_eq!(crds.len(), 1);
        assert!(crds[0].contains("mydbdbaasinstances.dbaas.mydb.example.com"));
        assert!(crds[0].contains("Namespaced"));
    }
}
