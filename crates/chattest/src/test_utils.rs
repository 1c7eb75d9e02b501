//! Test utilities for chattest crate

use crate::web::AppState;
use chattest_core::{config::get_config, credential::ApiKey, session::Session};
use std::fs;
use tempfile::{Builder, NamedTempFile};

/// Creates a temporary config file pointing at a test OpenAI-compatible server.
///
/// # Panics
/// Panics if temp directory creation or file writing fails.
pub fn create_temp_config_file(server_uri: &str) -> NamedTempFile {
    let temp_dir = Builder::new()
        .prefix("chattest-test")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let config_content = format!(
        r#"
models:
  test-model:
    name: test-model
    provider: openai
    base_url: "{server_uri}"
    api_key: "MOCK_OPENAI_API_KEY"
  other-model:
    provider: openai
    base_url: "{server_uri}"
    api_key: "MOCK_OPENAI_API_KEY"
profiles: {{}}
chat:
  model: test-model
  system_prompt: You are a helpful assistant.
"#,
    );

    let file = NamedTempFile::new_in(temp_dir.path()).unwrap();
    fs::write(file.path(), config_content).unwrap();

    // Keep the temp directory alive by leaking it (this is just for tests)
    let _ = Box::leak(Box::new(temp_dir));
    file
}

/// App state backed by the test server at `server_uri`.
pub fn create_test_state(server_uri: &str) -> AppState {
    let file = create_temp_config_file(server_uri);
    let config = get_config(Some(file.path().to_path_buf())).unwrap();
    let notice = ApiKey::for_model(&config.chat.model).notice();
    let session = Session::new(&config.chat).unwrap();
    AppState::new(session, notice).unwrap()
}
