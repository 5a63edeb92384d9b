//! `vmfix config` – print the effective configuration.

use anyhow::Result;
use vmfix_core::config::{self, FixtureConfig};

pub fn run_config(cfg: &FixtureConfig) -> Result<()> {
    let mut shown = cfg.clone();
    if shown.password.is_some() {
        shown.password = Some("***".to_string());
    }
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(&shown)?);
    println!("# effective poll policy: {:?}", cfg.poll_policy());
    Ok(())
}
