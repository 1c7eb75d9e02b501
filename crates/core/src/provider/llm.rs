use crate::completion::CompletionModel;
use crate::model::{ModelConfig, ModelProvider};
use crate::provider::openai;
use anyhow::Result;
use tracing::instrument;

#[instrument(skip(model_config))]
pub fn get_completion_llm(model_config: ModelConfig) -> Result<Box<dyn CompletionModel>> {
    match model_config.provider {
        ModelProvider::Openai => {
            let model = openai::OpenAIBaseModel::new(model_config)?;
            Ok(Box::new(model))
        }
    }
}
