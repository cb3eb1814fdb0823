//! CRD YAML Generator
//!
//! This binary generates Kubernetes CRD manifests for the custom resources
//! owned by the mydb-dbaas-operator.
//!
//! Usage: cargo run --bin crdgen > deploy/crds/all.yaml

use mydb_dbaas_operator::crd::generate_crds;

fn main() -> anyhow::Result<()> {
    for crd in generate_crds()? {
        println!("---");
        print!("{}", crd);
    }
    Ok(())
}
