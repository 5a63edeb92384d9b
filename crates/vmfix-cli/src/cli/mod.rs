//! CLI for the vmfix metrics fixture client.

mod commands;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use vmfix_core::config;
use vmfix_core::model::TimeWindow;
use vmfix_core::MetricsClient;

use commands::{run_config, run_delete, run_export, run_import, run_query_range, run_series};

/// Top-level CLI for vmfix.
#[derive(Debug, Parser)]
#[command(name = "vmfix")]
#[command(about = "vmfix: import, delete and poll metric fixtures in VictoriaMetrics", long_about = None)]
pub struct Cli {
    /// Override the backend URL from config/environment.
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by commands that take a time window.
#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Window length in minutes, ending now.
    #[arg(long, default_value = "60", value_name = "N")]
    pub minutes: i64,
    /// Step between samples in seconds.
    #[arg(long, default_value = "60", value_name = "S")]
    pub step: i64,
}

impl WindowArgs {
    /// The window of `--minutes` ending now.
    pub fn window(&self) -> Result<TimeWindow> {
        if self.minutes <= 0 {
            bail!("--minutes must be positive, got {}", self.minutes);
        }
        let span = chrono::Duration::try_minutes(self.minutes)
            .ok_or_else(|| anyhow!("--minutes {} is out of range", self.minutes))?;
        Ok(TimeWindow::last(span)?)
    }
}

/// Arguments of `vmfix import`.
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// Metric name (`__name__`).
    pub name: String,
    #[command(flatten)]
    pub window: WindowArgs,
    /// Use this value for every sample instead of random values.
    #[arg(long, conflicts_with_all = ["min", "max"])]
    pub value: Option<f64>,
    /// Lower bound of random values.
    #[arg(long, default_value = "0")]
    pub min: i64,
    /// Upper bound of random values.
    #[arg(long, default_value = "1000")]
    pub max: i64,
    /// `security` label.
    #[arg(long, default_value = vmfix_core::model::DEFAULT_SECURITY)]
    pub security: String,
    /// `step_count` label.
    #[arg(long)]
    pub step_count: Option<u32>,
    /// `risk_name` label.
    #[arg(long)]
    pub risk_name: Option<String>,
    /// Do not delete the existing series before importing.
    #[arg(long)]
    pub keep_existing: bool,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Generate a series for a metric and import it.
    Import(ImportArgs),

    /// Delete series matching the selectors.
    Delete {
        /// PromQL series selectors, e.g. `up{job="node"}`.
        #[arg(required = true)]
        selectors: Vec<String>,
        /// Return right after the delete request instead of polling until
        /// the series are gone.
        #[arg(long)]
        no_confirm: bool,
    },

    /// List series matching the selectors.
    Series {
        #[arg(required = true)]
        selectors: Vec<String>,
    },

    /// Run a range query over the last N minutes.
    QueryRange {
        query: String,
        #[command(flatten)]
        window: WindowArgs,
        /// Poll until the query returns data.
        #[arg(long)]
        wait: bool,
    },

    /// Export raw samples as JSON lines.
    Export {
        #[arg(required = true)]
        selectors: Vec<String>,
    },

    /// Print the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(url) = cli.url {
            cfg.url = url;
        }
        tracing::debug!("loaded config: url={} poll={:?}", cfg.url, cfg.poll_policy());

        let connect = || MetricsClient::from_config(&cfg);
        match cli.command {
            CliCommand::Import(args) => run_import(&connect()?, &args)?,
            CliCommand::Delete {
                selectors,
                no_confirm,
            } => run_delete(&connect()?, &selectors, !no_confirm)?,
            CliCommand::Series { selectors } => run_series(&connect()?, &selectors)?,
            CliCommand::QueryRange {
                query,
                window,
                wait,
            } => run_query_range(&connect()?, &query, &window, wait)?,
            CliCommand::Export { selectors } => run_export(&connect()?, &selectors)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
