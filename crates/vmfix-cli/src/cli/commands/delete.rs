//! `vmfix delete` – delete series and wait until they are gone.

use anyhow::Result;
use vmfix_core::MetricsClient;

pub fn run_delete(client: &MetricsClient, selectors: &[String], confirm: bool) -> Result<()> {
    if confirm {
        client.delete_and_confirm(selectors)?;
        println!("Deleted {} selector(s), confirmed.", selectors.len());
    } else {
        client.delete_series(selectors)?;
        println!("Delete requested for {} selector(s).", selectors.len());
    }
    Ok(())
}
