//! TOML configuration for the `meridian` CLI.
//!
//! Every section and field is optional; when no config file is given the
//! defaults describe a three-replica ring with no initial nodes.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Default vnodes per node.
const DEFAULT_REPLICAS: u32 = 3;

/// Default number of synthetic keys used by reports.
const DEFAULT_SAMPLE_KEYS: usize = 10_000;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring shape and initial membership.
    pub ring: RingSection,
    /// Synthetic key sample for distribution and churn reports.
    pub sample: SampleSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[ring]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RingSection {
    /// Vnodes placed per node.
    pub replicas: Option<u32>,
    /// Nodes added to the ring on startup, in order.
    pub nodes: Vec<String>,
}

/// `[sample]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SampleSection {
    /// Number of synthetic keys.
    pub keys: Option<usize>,
    /// Prefix of every synthetic key (`<prefix><n>`).
    pub prefix: Option<String>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read {}", p.display()))?;
                let config: CliConfig = toml::from_str(&content)
                    .with_context(|| format!("failed to parse {}", p.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective vnodes per node (config value or 3).
    pub fn replicas(&self) -> u32 {
        self.ring.replicas.unwrap_or(DEFAULT_REPLICAS)
    }

    /// Effective synthetic sample size (config value or 10 000).
    pub fn sample_keys(&self) -> usize {
        self.sample.keys.unwrap_or(DEFAULT_SAMPLE_KEYS)
    }

    /// Effective synthetic key prefix (config value or `"key-"`).
    pub fn sample_prefix(&self) -> &str {
        self.sample.prefix.as_deref().unwrap_or("key-")
    }

    /// Generate the synthetic key sample.
    pub fn sample(&self) -> Vec<String> {
        let prefix = self.sample_prefix();
        (0..self.sample_keys()).map(|i| format!("{prefix}{i}")).collect()
    }
}
