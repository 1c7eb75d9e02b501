//! API key resolution and the notice shown to the user about it.
//!
//! The key is never validated here. A missing key only produces a warning;
//! the completion service rejects the requests later and the rejection shows
//! up inline in the conversation.

use crate::model::ModelConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MISSING_HINT: &str = "not set - please head to the troubleshooting guide in the setup folder";

/// Number of leading characters revealed in the key preview.
const PREVIEW_LEN: usize = 8;

/// `api_key` setting used when a model does not specify one.
pub const DEFAULT_API_KEY_SETTING: &str = "env:OPENAI_API_KEY";

/// Load `.env` from `start` or the closest parent directory holding one.
///
/// Values from the file replace variables already set in the process. A
/// missing or unreadable file is not an error; the key then has to come from
/// the environment or the config. Returns the file that was loaded.
pub fn load_env_file(start: &Path) -> Option<PathBuf> {
    let Some(path) = start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file())
    else {
        debug!(dir = %start.display(), "No .env file found");
        return None;
    };

    match dotenvy::from_path_override(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to load .env file");
            None
        }
    }
}

/// Where the API key comes from, as written in the model settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Env(String),
    Literal(String),
}

impl KeySource {
    /// Parse an `api_key` setting. `env:NAME` reads the named variable.
    pub fn parse(setting: &str) -> Self {
        match setting.strip_prefix("env:") {
            Some(var) => KeySource::Env(var.trim().to_string()),
            None => KeySource::Literal(setting.to_string()),
        }
    }

    /// Name the page uses when the key is missing.
    fn missing_label(&self) -> &str {
        match self {
            KeySource::Env(var) => var,
            KeySource::Literal(_) => "API key",
        }
    }
}

/// A resolved API key, or the reason it is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKey {
    Present { source: KeySource, key: String },
    Missing { source: KeySource },
}

impl ApiKey {
    /// Resolve the key for a model from its `api_key` setting.
    pub fn for_model(model_config: &ModelConfig) -> Self {
        let setting: String = model_config
            .get_setting("api_key")
            .unwrap_or_else(|| DEFAULT_API_KEY_SETTING.to_string());
        Self::resolve(KeySource::parse(&setting))
    }

    pub fn resolve(source: KeySource) -> Self {
        let key = match &source {
            KeySource::Env(var) => std::env::var(var).ok(),
            KeySource::Literal(key) => Some(key.clone()),
        };
        match key.filter(|k| !k.is_empty()) {
            Some(key) => ApiKey::Present { source, key },
            None => ApiKey::Missing { source },
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            ApiKey::Present { key, .. } => Some(key),
            ApiKey::Missing { .. } => None,
        }
    }

    /// The first few characters of the key, safe to display.
    pub fn preview(&self) -> Option<String> {
        self.key().map(|k| k.chars().take(PREVIEW_LEN).collect())
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ApiKey::Present { .. })
    }

    /// Notice rendered at the top of the chat page.
    pub fn notice(&self) -> KeyNotice {
        match self {
            ApiKey::Present { .. } => KeyNotice {
                ok: true,
                text: format!(
                    "OpenAI API Key loaded and begins: {}",
                    self.preview().unwrap_or_default()
                ),
            },
            ApiKey::Missing { source } => KeyNotice {
                ok: false,
                text: format!("{} {MISSING_HINT}", source.missing_label()),
            },
        }
    }

    /// Line printed to the terminal before the server starts.
    pub fn startup_line(&self) -> String {
        match self.preview() {
            Some(preview) => format!("OpenAI API Key exists and begins {preview}"),
            None => format!("OpenAI API Key {MISSING_HINT}"),
        }
    }
}

/// A user facing line about the credential state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KeyNotice {
    pub ok: bool,
    pub text: String,
}
