//! Test utilities for chattest-core crate

use crate::completion::{
    ChatMessage, CompletionError, CompletionMetrics, CompletionModel, CompletionResponse,
};
use crate::config::ProfileConfig;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::Builder;

/// Creates a temporary config file with the given content.
///
/// # Panics
/// Panics if temp directory creation or file writing fails.
pub fn create_temp_config(content: &str) -> PathBuf {
    let temp_dir = Builder::new()
        .prefix("chattest-test")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let config_path = temp_dir.path().join("chattest.yml");
    std::fs::write(&config_path, content).unwrap();
    // Keep the temp directory alive by leaking it (this is just for tests)
    let _ = Box::leak(Box::new(temp_dir));
    config_path
}

pub fn dummy_model_config(name: &str) -> crate::model::ModelConfig {
    crate::model::ModelConfig {
        name: name.to_string(),
        provider: crate::model::ModelProvider::Openai,
        settings: std::collections::HashMap::from([(
            "base_url".to_string(),
            serde_yaml::Value::String("http://localhost:1234".to_string()),
        )]),
    }
}

/// A scripted `CompletionModel` that records every request it receives.
pub struct ScriptedModel {
    reply: Result<String, String>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with a transport error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _profile: &ProfileConfig,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                text: text.clone(),
                finish_reason: Some("stop".to_string()),
                metrics: CompletionMetrics::default(),
            }),
            Err(message) => Err(CompletionError::Transport(message.clone())),
        }
    }
}
