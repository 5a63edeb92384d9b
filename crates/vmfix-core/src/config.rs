use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::BasicAuth;
use crate::retry::{RetryConfig, RetryPolicy};

/// Environment variables that override the file settings.
pub const ENV_URL: &str = "VMFIX_URL";
pub const ENV_USER: &str = "VMFIX_USER";
pub const ENV_PASS: &str = "VMFIX_PASS";

/// Settings loaded from `~/.config/vmfix/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Base URL of the metrics backend (e.g. `https://stand:8428`).
    pub url: String,
    /// Basic-auth user; auth is sent only when both user and password are set.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Verify TLS certificates. Off by default for self-signed test stands.
    #[serde(default)]
    pub verify_tls: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Optional polling policy for confirmation loops; if missing, built-in
    /// defaults (20 retries, 2s apart) are used.
    #[serde(default)]
    pub poll: Option<RetryConfig>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8428".to_string(),
            user: None,
            password: None,
            verify_tls: false,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            poll: None,
        }
    }
}

impl FixtureConfig {
    pub fn basic_auth(&self) -> Option<BasicAuth> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(BasicAuth {
                user: user.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_policy(&self) -> RetryPolicy {
        self.poll
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_else(RetryPolicy::polling)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
            self.url = url;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user = Some(user);
        }
        if let Some(pass) = lookup(ENV_PASS) {
            self.password = Some(pass);
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vmfix")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Read and parse a config file.
pub fn load_from(path: &Path) -> Result<FixtureConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let cfg: FixtureConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load `path`, writing a default file first if none exists.
pub fn load_or_init_at(path: &Path) -> Result<FixtureConfig> {
    if !path.exists() {
        let default_cfg = FixtureConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

/// Load configuration from the XDG config dir, creating a default file if
/// none exists, then apply environment overrides.
pub fn load_or_init() -> Result<FixtureConfig> {
    let path = config_path()?;
    let mut cfg = load_or_init_at(&path)?;
    cfg.apply_env(|k| std::env::var(k).ok());
    Ok(cfg)
}
