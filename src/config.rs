//! Pipeline and dashboard configuration
//!
//! Every section has working defaults; a YAML file only needs the keys it
//! changes:
//!
//! ```yaml
//! pipeline:
//!   layout:
//!     seed: 42
//!   community:
//!     resolution: 1.0
//! dashboard:
//!   top_n: 10
//! ```

use crate::algo::{CommunityConfig, EigenvectorConfig, LayoutConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Upper bound on spring layout steps
pub const MAX_LAYOUT_ITERATIONS: usize = 100_000;

/// Settings for the analytics stages
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Greedy modularity settings
    pub community: CommunityConfig,
    /// Power iteration settings
    pub eigenvector: EigenvectorConfig,
    /// Spring layout settings
    pub layout: LayoutConfig,
}

impl PipelineConfig {
    /// Reject settings no stage can run with
    pub fn validate(&self) -> ConfigResult<()> {
        let eigen = &self.eigenvector;
        if eigen.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "eigenvector.max_iterations must be at least 1".to_string(),
            ));
        }
        if !(eigen.tolerance.is_finite() && eigen.tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "eigenvector.tolerance must be a non-negative number, got {}",
                eigen.tolerance
            )));
        }

        let resolution = self.community.resolution;
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "community.resolution must be positive, got {}",
                resolution
            )));
        }

        let layout = &self.layout;
        if layout.iterations > MAX_LAYOUT_ITERATIONS {
            return Err(ConfigError::Invalid(format!(
                "layout.iterations must be at most {}, got {}",
                MAX_LAYOUT_ITERATIONS, layout.iterations
            )));
        }
        if layout.threshold.is_nan() || layout.threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "layout.threshold must be non-negative, got {}",
                layout.threshold
            )));
        }
        if !(layout.scale.is_finite() && layout.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "layout.scale must be positive, got {}",
                layout.scale
            )));
        }

        Ok(())
    }
}

/// Settings for the presentation tables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows in a metric ranking
    pub top_n: usize,
    /// Rows in a community preview
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            preview_rows: 10,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file
    pub fn from_yaml_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Override the layout seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.pipeline.layout.seed = Some(seed);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.pipeline.validate()
    }
}
