//! `vmfix export` – dump raw samples as import-compatible JSON lines.

use anyhow::Result;
use vmfix_core::MetricsClient;

pub fn run_export(client: &MetricsClient, selectors: &[String]) -> Result<()> {
    for series in client.export(selectors)? {
        println!("{}", serde_json::to_string(&series)?);
    }
    Ok(())
}
