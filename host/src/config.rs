//! Host configuration file

use anyhow::{Context, Result};
use perf::{ConfigUpdate, PerformanceConfig, DEFAULT_METRICS_CAPACITY};
use result_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of the host's JSON configuration file.
///
/// Every section is optional; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    /// Applied on top of the default performance configuration
    pub performance: ConfigUpdate,
    pub result_cache: CacheConfig,
    pub metrics_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            performance: ConfigUpdate::default(),
            result_cache: CacheConfig::default(),
            metrics_capacity: DEFAULT_METRICS_CAPACITY,
        }
    }
}

impl HostConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields defaults. A file that exists but does not parse
    /// is logged and also yields defaults; only I/O errors are returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        match serde_json::from_str::<HostConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Failed to parse config file, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// The performance configuration after applying the file's overrides.
    pub fn performance_config(&self) -> PerformanceConfig {
        let mut config = PerformanceConfig::default();
        config.apply(&self.performance);
        config
    }
}
