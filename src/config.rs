//! Runtime configuration.
//!
//! Values come from defaults, then an optional TOML file, then environment
//! overrides (`COMPASS_MODEL`, `COMPASS_SAMPLE_SIZE`,
//! `COMPASS_ANALYSIS_TIMEOUT_SECONDS`, `COMPASS_BANK_PATH`). Provider
//! credentials stay in the `OPENROUTER_*` variables read by the gateway.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::generator::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::analysis::requestor::DEFAULT_ANALYSIS_TIMEOUT;
use crate::bank::QuestionBank;
use crate::error::ConfigError;
use crate::gateway::GatewayConfig;
use crate::sampler::{Sampler, DEFAULT_SAMPLE_SIZE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompassConfig {
    /// Questions per session.
    pub sample_size: usize,
    /// OpenRouter model id for archetype generation.
    pub model: String,
    pub temperature: f32,
    pub analysis_timeout_secs: u64,
    /// Gateway retries for retryable provider errors.
    pub max_retries: u32,
    /// Custom question bank (`.json` or `.toml`); builtin bank when unset.
    pub bank_path: Option<PathBuf>,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            analysis_timeout_secs: DEFAULT_ANALYSIS_TIMEOUT.as_secs(),
            max_retries: 0,
            bank_path: None,
        }
    }
}

impl CompassConfig {
    /// Defaults, then `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(model) = lookup("COMPASS_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
        if let Some(size) = lookup("COMPASS_SAMPLE_SIZE") {
            self.sample_size = parse_env("COMPASS_SAMPLE_SIZE", &size)?;
        }
        if let Some(secs) = lookup("COMPASS_ANALYSIS_TIMEOUT_SECONDS") {
            self.analysis_timeout_secs = parse_env("COMPASS_ANALYSIS_TIMEOUT_SECONDS", &secs)?;
        }
        if let Some(path) = lookup("COMPASS_BANK_PATH").filter(|p| !p.trim().is_empty()) {
            self.bank_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        Ok(())
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            max_retries: self.max_retries,
            ..GatewayConfig::default()
        }
    }

    /// The configured bank, loaded and validated.
    pub fn load_bank(&self) -> Result<Arc<QuestionBank>, ConfigError> {
        match &self.bank_path {
            Some(path) => Ok(Arc::new(QuestionBank::from_path(path)?)),
            None => Ok(Arc::new(QuestionBank::builtin().clone())),
        }
    }

    /// Bank plus sampler. Fails when the bank cannot fill a session.
    pub fn build_sampler(&self) -> Result<Sampler, ConfigError> {
        Sampler::new(self.load_bank()?, self.sample_size)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Parse {
        path: PathBuf::from(format!("${key}")),
        message: format!("invalid value {value:?}"),
    })
}
