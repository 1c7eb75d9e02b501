use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashMap;

/// Model configuration for the tool.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "type")]
    pub provider: ModelProvider,
    #[serde(default, flatten)]
    pub settings: HashMap<String, serde_yaml::Value>,
}

impl ModelConfig {
    /// Read a provider specific setting, `None` if absent or of the wrong shape.
    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.settings
            .get(key)
            .and_then(|v| serde_yaml::from_value(v.clone()).ok())
    }
}

/// Supported model provider integrations (serialized as lowercase strings).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Openai,
}

impl From<ModelProvider> for String {
    fn from(val: ModelProvider) -> Self {
        val.as_str().into()
    }
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match &self {
            ModelProvider::Openai => "openai",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_from_yaml() {
        let yaml = r#"
type: openai
base_url: https://api.openai.com/v1
timeout: 30
"#;
        let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.provider, ModelProvider::Openai);
        assert_eq!(config.name, "");
        assert_eq!(
            config.get_setting::<String>("base_url").as_deref(),
            Some("https://api.openai.com/v1")
        );
        assert_eq!(config.get_setting::<u64>("timeout"), Some(30));
        assert_eq!(config.get_setting::<String>("api_key"), None);
    }
}
