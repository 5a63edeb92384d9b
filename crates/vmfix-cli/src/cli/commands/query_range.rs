//! `vmfix query-range` – run a range query over the last N minutes.

use anyhow::Result;
use vmfix_core::MetricsClient;

use crate::cli::WindowArgs;

pub fn run_query_range(
    client: &MetricsClient,
    query: &str,
    window: &WindowArgs,
    wait: bool,
) -> Result<()> {
    let range = window.window()?;
    let result = if wait {
        client.wait_for_range_data(query, &range, window.step)?
    } else {
        client.query_range(query, &range, window.step)?
    };

    if result.is_empty() {
        println!("No data.");
    }
    for series in result {
        let values = series.numeric_values();
        println!(
            "{} points={} last={}",
            serde_json::to_string(&series.metric)?,
            values.len(),
            values
                .last()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}
