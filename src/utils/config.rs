use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "SOCIALFLOW_BASE_URL";
pub const TIMEOUT_ENV: &str = "SOCIALFLOW_TIMEOUT_MS";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Base endpoint every scenario path is appended to
    pub base_url: String,

    /// Per-request timeout (ms)
    pub timeout_ms: u64,

    /// Product name advertised by the root endpoint
    pub product_name: String,

    /// Output directory for reports
    pub output_dir: PathBuf,

    /// Write JSON and JUnit reports after the run
    pub report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_ms: 10_000,
            product_name: "SocialFlow Pro".to_string(),
            output_dir: PathBuf::from("./output"),
            report: false,
        }
    }
}

impl Config {
    /// Load a YAML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.timeout_ms = raw.trim().parse().with_context(|| {
                format!(
                    "{} must be a number of milliseconds, got '{}'",
                    TIMEOUT_ENV, raw
                )
            })?;
        }
        Ok(())
    }

    /// Normalize and check the final configuration
    pub fn validate(mut self) -> Result<Self> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            anyhow::bail!("Base URL must not be empty");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("Base URL must start with http:// or https://: {}", self.base_url);
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("Timeout must be greater than zero");
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Text the root endpoint's message must contain
    pub fn connectivity_marker(&self) -> String {
        format!("{} API", self.product_name)
    }
}
