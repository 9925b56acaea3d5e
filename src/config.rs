// src/config.rs
//! Engine configuration (TOML + env overrides).
//!
//! ```toml
//! high_confidence_threshold = 0.7
//! safe_amounts = [100, 150, 200, 250, 300]
//! honor_stated_quantity = false
//! ```
//!
//! Resolution: `$SERVING_CONFIG_PATH` (must exist) → `config/engine.toml`
//! (optional) → built-in defaults. `$SERVING_HIGH_CONFIDENCE_THRESHOLD`
//! overrides the threshold from either source.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::DEFAULT_HIGH_CONFIDENCE_THRESHOLD;
use crate::portions::DEFAULT_SAFE_AMOUNTS;

pub const DEFAULT_ENGINE_CONFIG_PATH: &str = "config/engine.toml";
pub const ENV_ENGINE_CONFIG_PATH: &str = "SERVING_CONFIG_PATH";
pub const ENV_HIGH_CONFIDENCE_THRESHOLD: &str = "SERVING_HIGH_CONFIDENCE_THRESHOLD";

fn default_threshold() -> f32 {
    DEFAULT_HIGH_CONFIDENCE_THRESHOLD
}

fn default_safe_amounts() -> Vec<f64> {
    DEFAULT_SAFE_AMOUNTS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Atomic foods at or above this score get preset ladders.
    #[serde(default = "default_threshold")]
    pub high_confidence_threshold: f32,
    /// Generic safe-output ladder, in g or ml.
    #[serde(default = "default_safe_amounts")]
    pub safe_amounts: Vec<f64>,
    /// Replace preset ladders with one exact-count option for "2 sausages".
    #[serde(default)]
    pub honor_stated_quantity: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: default_threshold(),
            safe_amounts: default_safe_amounts(),
            honor_stated_quantity: false,
        }
    }
}

impl EngineConfig {
    /// Load using env + fallbacks, then apply the threshold override.
    pub fn from_toml() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_ENGINE_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    return Err(anyhow!(
                        "{ENV_ENGINE_CONFIG_PATH} points to non-existent path {}",
                        path.display()
                    ));
                }
                Self::from_path(&path)?
            }
            Err(_) => {
                let path = PathBuf::from(DEFAULT_ENGINE_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_HIGH_CONFIDENCE_THRESHOLD).ok()) {
            cfg.high_confidence_threshold = t;
        }
        Ok(cfg.sanitized())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing engine config {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: EngineConfig = toml::from_str(toml_str)?;
        Ok(cfg.sanitized())
    }

    /// Clamp the threshold and drop unusable ladder amounts.
    fn sanitized(mut self) -> Self {
        if !self.high_confidence_threshold.is_finite() {
            self.high_confidence_threshold = default_threshold();
        }
        self.high_confidence_threshold = self.high_confidence_threshold.clamp(0.0, 1.0);

        self.safe_amounts.retain(|a| a.is_finite() && *a > 0.0);
        if self.safe_amounts.is_empty() {
            self.safe_amounts = default_safe_amounts();
        }
        self
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
