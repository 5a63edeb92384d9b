//! `vmfix series` – list matching series.

use anyhow::Result;
use vmfix_core::MetricsClient;

pub fn run_series(client: &MetricsClient, selectors: &[String]) -> Result<()> {
    let response = client.series(selectors)?;
    if response.is_empty() {
        println!("No series.");
        return Ok(());
    }
    for labels in &response.data {
        println!("{}", serde_json::to_string(labels)?);
    }
    Ok(())
}
