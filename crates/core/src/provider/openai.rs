use super::openai_types::{
    ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, RequestMessage,
};
use crate::completion::{
    ChatMessage, CompletionError, CompletionMetrics, CompletionModel, CompletionResponse,
};
use crate::config::ProfileConfig;
use crate::credential::ApiKey;
use crate::model::ModelConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for an OpenAI compatible `/chat/completions` endpoint.
pub struct OpenAIBaseModel {
    name: String,
    endpoint: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl OpenAIBaseModel {
    #[instrument(skip(model_config), fields(model = %model_config.name))]
    pub fn new(model_config: ModelConfig) -> Result<Self> {
        let base_url: String = model_config
            .get_setting("base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = model_config.get_setting::<u64>("timeout") {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        debug!(endpoint = %endpoint, "Configured OpenAI compatible model");

        Ok(Self {
            api_key: ApiKey::for_model(&model_config),
            name: model_config.name,
            endpoint,
            client,
        })
    }

    fn to_openai_message(msg: &ChatMessage) -> RequestMessage<'_> {
        RequestMessage {
            role: msg.sender.as_str(),
            content: msg.text.as_str(),
        }
    }

    async fn error_from_response(response: reqwest::Response) -> CompletionError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => body,
        };
        CompletionError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAIBaseModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        profile: &ProfileConfig,
    ) -> Result<CompletionResponse, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.name,
            messages: messages
                .iter()
                .map(OpenAIBaseModel::to_openai_message)
                .collect(),
            max_tokens: profile.max_tokens,
            temperature: profile.temperature,
            n: 1,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = self.api_key.key() {
            request = request.bearer_auth(key);
        }

        let start_time = Instant::now();
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let latency = start_time.elapsed().as_millis() as f32;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            CompletionError::InvalidResponse("response contained no choices".to_string())
        })?;

        let metrics = completion
            .usage
            .map(|usage| CompletionMetrics {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                completion_latency_ms: latency,
            })
            .unwrap_or(CompletionMetrics {
                completion_latency_ms: latency,
                ..Default::default()
            });

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            metrics,
        })
    }
}
