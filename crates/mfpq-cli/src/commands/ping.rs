//! `mfpq ping` — connectivity check against the index host.

use anyhow::Context;
use mfpq_core::{EsClient, IndexConfig};

pub fn run(config: &IndexConfig) -> anyhow::Result<()> {
    let client = EsClient::new(config);
    let info = client
        .ping()
        .with_context(|| format!("no response from {}", config.base_url()))?;

    if info.cluster_name.is_empty() {
        println!("Reachable: {}", config.base_url());
    } else {
        println!(
            "Reachable: {} (cluster '{}', version {})",
            config.base_url(),
            info.cluster_name,
            info.version.number
        );
    }
    Ok(())
}
