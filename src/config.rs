//! Shared config utilities for loading/saving JSON config files,
//! plus the engine-level configuration.

use crate::ai::latency::LatencyConfig;
use crate::error::{CoachError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration, persisted to `engine_config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed RNG seed. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub latency: LatencyConfig,
}

impl EngineConfig {
    /// Deterministic, zero-latency configuration.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            latency: LatencyConfig::instant(),
        }
    }
}

pub const ENGINE_CONFIG_FILE: &str = "engine_config.json";

/// Directory holding the engine's JSON files (`<config_dir>/intellimate`).
pub fn default_config_dir() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("intellimate")
}

pub fn default_engine_config_path() -> PathBuf {
    default_config_dir().join(ENGINE_CONFIG_FILE)
}

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                tracing::info!(label, path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(
                    label,
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                T::default()
            }
        },
        Err(_) => {
            tracing::info!(label, path = %path.display(), "no config file, using defaults");
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> Result<()> {
    let io_err = |source: std::io::Error| CoachError::ConfigIo {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).map_err(io_err)?;
    tracing::info!(label, path = %path.display(), "saved config");
    Ok(())
}

/// Async variant of [`save_json_config`] for callers on the runtime.
pub async fn save_json_config_async<T: Serialize>(path: &Path, config: &T, label: &str) -> Result<()> {
    let io_err = |source: std::io::Error| CoachError::ConfigIo {
        path: path.display().to_string(),
        source,
    };
    let json = serde_json::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, json).await.map_err(io_err)?;
    tracing::info!(label, path = %path.display(), "saved config");
    Ok(())
}

pub fn load_engine_config(path: &Path) -> EngineConfig {
    load_json_config(path, "Engine")
}

pub fn save_engine_config(path: &Path, config: &EngineConfig) -> Result<()> {
    save_json_config(path, config, "Engine")
}
