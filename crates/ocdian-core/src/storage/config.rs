//! TOML-based application configuration.
//!
//! Stores exercise presets and feedback preferences:
//! - Breathing phase lengths and cycle count
//! - Body-scan and mindfulness durations
//! - Allowed ERP exposure lengths
//! - Sound and haptic feedback toggles
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Breathing exercise preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_breath_secs")]
    pub inhale_secs: u32,
    #[serde(default = "default_breath_secs")]
    pub exhale_secs: u32,
    #[serde(default = "default_breath_cycles")]
    pub cycles: u32,
    #[serde(default = "default_prepare_secs")]
    pub prepare_secs: u32,
}

/// Body-scan exercise preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyScanConfig {
    #[serde(default = "default_exercise_secs")]
    pub total_secs: u32,
}

/// Mindfulness exercise preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessConfig {
    #[serde(default = "default_exercise_secs")]
    pub total_secs: u32,
    #[serde(default = "default_quote_interval")]
    pub quote_interval_secs: u32,
}

/// Exposure timer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpConfig {
    #[serde(default = "default_erp_options")]
    pub duration_options: Vec<u32>,
    #[serde(default = "default_erp_secs")]
    pub default_secs: u32,
}

/// Feedback collaborators (sound on phase change, haptic on completion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub haptics: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub body_scan: BodyScanConfig,
    #[serde(default)]
    pub mindfulness: MindfulnessConfig,
    #[serde(default)]
    pub erp: ErpConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

// Default functions
fn default_breath_secs() -> u32 {
    4
}
fn default_breath_cycles() -> u32 {
    7
}
fn default_prepare_secs() -> u32 {
    1
}
fn default_exercise_secs() -> u32 {
    90
}
fn default_quote_interval() -> u32 {
    15
}
fn default_erp_options() -> Vec<u32> {
    vec![60, 300, 600]
}
fn default_erp_secs() -> u32 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale_secs: default_breath_secs(),
            exhale_secs: default_breath_secs(),
            cycles: default_breath_cycles(),
            prepare_secs: default_prepare_secs(),
        }
    }
}

impl Default for BodyScanConfig {
    fn default() -> Self {
        Self {
            total_secs: default_exercise_secs(),
        }
    }
}

impl Default for MindfulnessConfig {
    fn default() -> Self {
        Self {
            total_secs: default_exercise_secs(),
            quote_interval_secs: default_quote_interval(),
        }
    }
}

impl Default for ErpConfig {
    fn default() -> Self {
        Self {
            duration_options: default_erp_options(),
            default_secs: default_erp_secs(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound: true,
            haptics: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default on-disk location.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the default config cannot be written. Only a missing file is
    /// replaced; anything else on disk is left untouched.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| load_failed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Load from the default location.
    ///
    /// # Errors
    /// See [`Config::load_from`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// See [`Config::save_to`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
