use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::model::ModelConfig;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const APP_DIR: &str = "chattest";
const CONFIG_FILE_NAME: &str = "chattest.yml";
const LOG_FILE_NAME: &str = "chattest.log";
const DEFAULT_CONFIG: &str = include_str!("../data/config.yml");

/// `$XDG_CONFIG_HOME/chattest/chattest.yml`, or the platform config dir.
pub fn default_config_path() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE_NAME)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Generation parameters sent with every completion request.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProfileConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    pub system_prompt: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7860
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where `--verbose` writes its log and how much of it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Size above which the log is moved aside on startup.
    #[serde(default = "default_log_max_size_kb")]
    pub max_size_kb: u64,
}

fn default_log_filter() -> String {
    "chattest=debug,chattest_core=debug,tower_http=info".to_string()
}

fn default_log_max_size_kb() -> u64 {
    100
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
            max_size_kb: default_log_max_size_kb(),
        }
    }
}

impl LogConfig {
    /// Configured log file, else `chattest.log` under `$XDG_DATA_HOME/chattest`
    /// or the platform data dir. Nothing is created on disk.
    pub fn log_path(&self) -> PathBuf {
        if let Some(file) = &self.file {
            return file.clone();
        }
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(LOG_FILE_NAME)
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_kb * 1024
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub models: HashMap<String, ModelConfig>,
    pub profiles: HashMap<String, ProfileConfig>,
    pub chat: ChatConfig,
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum StringOrObject<T> {
    String(String),
    Object(T),
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    #[serde(default)]
    models: HashMap<String, ModelConfig>,
    #[serde(default)]
    profiles: HashMap<String, ProfileConfig>,
    chat: RawChatConfig,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    log: LogConfig,
}

#[derive(Deserialize, Debug)]
struct RawChatConfig {
    model: StringOrObject<ModelConfig>,
    #[serde(default)]
    profile: Option<StringOrObject<ProfileConfig>>,
    #[serde(default)]
    system_prompt: Option<String>,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, ConfigError> {
        let mut models_with_names = HashMap::new();
        for (k, v) in &self.models {
            // Model key doubles as the API model identifier unless `name` is set
            let model_name = if v.name.is_empty() {
                k.clone()
            } else {
                v.name.clone()
            };
            let model = ModelConfig {
                name: model_name,
                ..v.clone()
            };
            models_with_names.insert(k.clone(), model);
        }

        let model = match &self.chat.model {
            StringOrObject::String(s) => models_with_names
                .get(s)
                .cloned()
                .ok_or_else(|| ConfigError::Config(format!("Model '{s}' not found")))?,
            StringOrObject::Object(m) if m.name.is_empty() => {
                return Err(ConfigError::Config(
                    "Inline model requires a name".to_string(),
                ));
            }
            StringOrObject::Object(m) => m.clone(),
        };

        let profile = match &self.chat.profile {
            Some(StringOrObject::String(s)) => self
                .profiles
                .get(s)
                .cloned()
                .ok_or_else(|| ConfigError::Config(format!("Profile '{s}' not found")))?,
            Some(StringOrObject::Object(p)) => p.clone(),
            None => ProfileConfig::default(),
        };

        let system_prompt = self
            .chat
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(Config {
            models: models_with_names,
            profiles: self.profiles.clone(),
            chat: ChatConfig {
                model,
                profile,
                system_prompt,
            },
            server: self.server.clone(),
            log: self.log.clone(),
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), ConfigError> {
    let actual_path = config_path.unwrap_or_else(default_config_path);

    let parent_dir = actual_path.parent().ok_or_else(|| {
        ConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(DEFAULT_CONFIG.as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;
    raw.to_config()
}
