use chattest_core::{credential::KeyNotice, transcript::Transcript};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Transcript,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub model: String,
    pub key_notice: KeyNotice,
}
