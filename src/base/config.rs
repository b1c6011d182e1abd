//! Load configuration via `config` crate with env-override support.

use std::{
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;

use crate::base::prompts;

use super::types::{RelayError, Res};

/// Default model to use
fn default_model() -> String {
    "gemini-1.5-pro".to_string()
}

/// Default system preamble for the advisor.
fn default_system_preamble() -> String {
    prompts::SYSTEM_PREAMBLE.to_string()
}

/// Default Gemini REST endpoint.
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Default name of the brand column in the dataset.
fn default_dataset_brand_column() -> String {
    "brand".to_string()
}

/// Default address for the web form.
fn default_listen_address() -> String {
    "127.0.0.1:8501".to_string()
}

/// Which hosted text-generation service answers questions.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini (`gemini`).
    #[default]
    Gemini,
    /// OpenAI (`openai`).
    OpenAi,
}

/// Configuration for the car-advisor application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The validated settings.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Raw settings, as read from the file and environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Provider that answers questions (`LLM_PROVIDER`).
    #[serde(default)]
    pub llm_provider: LlmProvider,
    /// Google Gemini API key (`GOOGLE_API_KEY`).
    #[serde(default)]
    pub google_api_key: Option<String>,
    /// OpenAI API key (`OPENAI_API_KEY`).
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Model to use with the selected provider (`MODEL`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Optional sampling temperature (`TEMPERATURE`).
    /// Value between 0 and 2. When unset, the provider default applies.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Optional custom preamble to override the default (`SYSTEM_PREAMBLE`).
    #[serde(default = "default_system_preamble")]
    pub system_preamble: String,
    /// Gemini REST base URL (`GEMINI_BASE_URL`).
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    /// Optional OpenAI-compatible base URL (`OPENAI_BASE_URL`).
    #[serde(default)]
    pub openai_base_url: Option<String>,
    /// Path to the reference dataset (`DATASET_PATH`).
    /// When set, the dataset is required and is included in every prompt.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    /// Name of the brand column in the dataset (`DATASET_BRAND_COLUMN`).
    #[serde(default = "default_dataset_brand_column")]
    pub dataset_brand_column: String,
    /// Address the web form listens on (`LISTEN_ADDRESS`).
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::default(),
            google_api_key: None,
            openai_api_key: None,
            model: default_model(),
            temperature: None,
            system_preamble: default_system_preamble(),
            gemini_base_url: default_gemini_base_url(),
            openai_base_url: None,
            dataset_path: None,
            dataset_brand_column: default_dataset_brand_column(),
            listen_address: default_listen_address(),
        }
    }
}

impl ConfigInner {
    /// The name of the credential the selected provider needs.
    pub fn credential_name(&self) -> &'static str {
        match self.llm_provider {
            LlmProvider::Gemini => "google_api_key",
            LlmProvider::OpenAi => "openai_api_key",
        }
    }

    /// The credential for the selected provider, if present and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.llm_provider {
            LlmProvider::Gemini => self.google_api_key.as_deref(),
            LlmProvider::OpenAi => self.openai_api_key.as_deref(),
        };

        key.filter(|k| !k.trim().is_empty())
    }
}

impl Config {
    /// Load from an optional TOML file, overlaid by `CAR_ADVISOR_*` environment variables.
    ///
    /// A credential still missing after that is taken from the hosting
    /// environment's plain `GOOGLE_API_KEY` / `OPENAI_API_KEY` secret.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        cfg = cfg.add_source(config::Environment::default().prefix("CAR_ADVISOR"));

        let mut inner: ConfigInner = cfg.build()?.try_deserialize()?;

        if is_blank(&inner.google_api_key) {
            inner.google_api_key = std::env::var("GOOGLE_API_KEY").ok();
        }

        if is_blank(&inner.openai_api_key) {
            inner.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        Self::new(inner)
    }

    /// Validate an already-built configuration.
    pub fn new(inner: ConfigInner) -> Res<Self> {
        if inner.api_key().is_none() {
            return Err(RelayError::ConfigurationMissing(inner.credential_name().to_string()).into());
        }

        if let Some(temperature) = inner.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow::anyhow!("Temperature must be between 0 and 2."));
            }
        }

        if inner.model.trim().is_empty() {
            return Err(anyhow::anyhow!("Model must not be empty."));
        }

        if inner.listen_address.trim().is_empty() {
            return Err(anyhow::anyhow!("Listen address must not be empty."));
        }

        Ok(Config { inner: Arc::new(inner) })
    }
}

fn is_blank(key: &Option<String>) -> bool {
    key.as_deref().is_none_or(|k| k.trim().is_empty())
}
