//! Style & strategy preferences, persisted to `style_preferences.json`.

use super::strategy::DatingStrategy;
use super::style_adapter::{Enthusiasm, Formality, StyleParameters, MEDIUM_HUMOR};
use crate::config;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub const PREFERENCES_FILE: &str = "style_preferences.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreferences {
    #[serde(default)]
    pub formality: Formality,
    #[serde(default = "default_humor")]
    pub humor_level: f32,
    #[serde(default)]
    pub enthusiasm: Enthusiasm,
    #[serde(default)]
    pub dating_strategy: DatingStrategy,
    #[serde(default)]
    pub voice_assist_enabled: bool,
}

fn default_humor() -> f32 {
    MEDIUM_HUMOR
}

impl Default for StylePreferences {
    fn default() -> Self {
        Self {
            formality: Formality::Medium,
            humor_level: default_humor(),
            enthusiasm: Enthusiasm::Neutral,
            dating_strategy: DatingStrategy::Balanced,
            voice_assist_enabled: false,
        }
    }
}

impl StylePreferences {
    pub fn style(&self) -> StyleParameters {
        StyleParameters::new(self.formality, self.humor_level, self.enthusiasm)
    }
}

pub fn load_preferences(path: &Path) -> StylePreferences {
    let mut prefs: StylePreferences = config::load_json_config(path, "Style");
    prefs.humor_level = prefs.humor_level.clamp(0.0, 1.0);
    prefs
}

pub async fn save_preferences(path: &Path, prefs: &StylePreferences) -> Result<()> {
    config::save_json_config_async(path, prefs, "Style").await
}

/// `<config_dir>/intellimate/style_preferences.json`
pub fn default_preferences_path() -> PathBuf {
    config::default_config_dir().join(PREFERENCES_FILE)
}

/// Yields the current preferences on demand.
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    async fn current(&self) -> StylePreferences;
}

/// Fixed preferences, mostly for tests and embedding.
pub struct StaticPreferences(pub StylePreferences);

#[async_trait]
impl PreferenceSource for StaticPreferences {
    async fn current(&self) -> StylePreferences {
        self.0.clone()
    }
}

/// JSON-file-backed preferences. Setters persist before updating memory.
pub struct FilePreferences {
    prefs: RwLock<StylePreferences>,
    path: PathBuf,
}

impl FilePreferences {
    pub fn open(path: PathBuf) -> Self {
        let prefs = load_preferences(&path);
        Self {
            prefs: RwLock::new(prefs),
            path,
        }
    }

    /// Open the preferences file in the default config directory.
    pub fn open_default() -> Self {
        Self::open(default_preferences_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update(&self, apply: impl FnOnce(&mut StylePreferences)) -> Result<()> {
        let mut guard = self.prefs.write().await;
        let mut next = guard.clone();
        apply(&mut next);
        save_preferences(&self.path, &next).await?;
        *guard = next;
        Ok(())
    }

    pub async fn set_formality(&self, formality: Formality) -> Result<()> {
        tracing::debug!(?formality, "formality updated");
        self.update(|p| p.formality = formality).await
    }

    pub async fn set_humor_level(&self, humor_level: f32) -> Result<()> {
        tracing::debug!(humor_level, "humor level updated");
        self.update(|p| p.humor_level = humor_level.clamp(0.0, 1.0))
            .await
    }

    pub async fn set_enthusiasm(&self, enthusiasm: Enthusiasm) -> Result<()> {
        tracing::debug!(?enthusiasm, "enthusiasm updated");
        self.update(|p| p.enthusiasm = enthusiasm).await
    }

    pub async fn set_dating_strategy(&self, strategy: DatingStrategy) -> Result<()> {
        tracing::debug!(strategy = strategy.name(), "dating strategy updated");
        self.update(|p| p.dating_strategy = strategy).await
    }

    pub async fn set_voice_assist(&self, enabled: bool) -> Result<()> {
        tracing::debug!(enabled, "voice assist mode updated");
        self.update(|p| p.voice_assist_enabled = enabled).await
    }
}

#[async_trait]
impl PreferenceSource for FilePreferences {
    async fn current(&self) -> StylePreferences {
        self.prefs.read().await.clone()
    }
}
