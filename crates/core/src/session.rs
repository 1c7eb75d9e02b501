//! A session pairs a completion model with the fixed instruction and
//! generation profile used for every turn.
//!
//! The session holds no conversation state. The transcript is handed in with
//! each turn and handed back with the new exchange appended.
use crate::{
    completion::{ChatMessage, CompletionModel, SenderType},
    config::{ChatConfig, ProfileConfig},
    transcript::{Transcript, Turn},
};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Input field value and transcript to display after a turn or a reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub message: String,
    pub history: Transcript,
}

pub struct Session {
    model: Box<dyn CompletionModel>,
    system_prompt: String,
    profile: ProfileConfig,
}

impl Session {
    /// Create a session for the configured chat model.
    pub fn new(chat_config: &ChatConfig) -> Result<Self> {
        let model = crate::get_completion_llm(chat_config.model.clone())
            .context("Failed to initialize session model")?;

        Ok(Self::with_model(
            model,
            &chat_config.system_prompt,
            chat_config.profile.clone(),
        ))
    }

    pub fn with_model(
        model: Box<dyn CompletionModel>,
        system_prompt: &str,
        profile: ProfileConfig,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.to_string(),
            profile,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Role tagged request for `message` following `history`.
    ///
    /// Empty user or assistant texts in the history are left out, same as
    /// absent ones.
    pub fn build_messages(&self, message: &str, history: &Transcript) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(ChatMessage::new(SenderType::System, &self.system_prompt));

        for turn in history {
            if !turn.user().is_empty() {
                messages.push(ChatMessage::new(SenderType::User, turn.user()));
            }
            if let Some(reply) = turn.assistant().filter(|r| !r.is_empty()) {
                messages.push(ChatMessage::new(SenderType::Assistant, reply));
            }
        }

        messages.push(ChatMessage::new(SenderType::User, message));
        messages
    }

    /// Send `message` with the prior turns and append the exchange.
    ///
    /// Never fails: a completion error becomes the assistant side of the new
    /// turn as `Error: <description>`.
    #[instrument(skip_all, fields(model = %self.model.name(), history_len = history.len()))]
    pub async fn exchange(&self, message: &str, mut history: Transcript) -> TurnOutcome {
        let messages = self.build_messages(message, &history);
        debug!(messages = messages.len(), "Sending chat completion request");

        let reply = match self.model.complete(&messages, &self.profile).await {
            Ok(response) => {
                info!(
                    finish_reason = ?response.finish_reason,
                    prompt_tokens = response.metrics.prompt_tokens,
                    completion_tokens = response.metrics.completion_tokens,
                    latency_ms = response.metrics.completion_latency_ms,
                    "Completion received"
                );
                response.text
            }
            Err(err) => {
                warn!(error = %err, "Completion failed");
                format!("Error: {err}")
            }
        };

        history.push(Turn::new(message, Some(reply)));
        TurnOutcome {
            message: String::new(),
            history,
        }
    }

    /// Start over with an empty transcript and input field.
    pub fn clear() -> TurnOutcome {
        TurnOutcome {
            message: String::new(),
            history: Transcript::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedModel;
    use std::sync::Arc;

    const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

    // Shares the scripted model with the test so requests can be inspected
    struct Shared(Arc<ScriptedModel>);

    #[async_trait::async_trait]
    impl CompletionModel for Shared {
        fn name(&self) -> &str {
            self.0.name()
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            profile: &ProfileConfig,
        ) -> Result<crate::completion::CompletionResponse, crate::completion::CompletionError>
        {
            self.0.complete(messages, profile).await
        }
    }

    fn session_with(model: ScriptedModel) -> (Session, Arc<ScriptedModel>) {
        let model = Arc::new(model);
        let session = Session::with_model(
            Box::new(Shared(model.clone())),
            SYSTEM_PROMPT,
            ProfileConfig::default(),
        );
        (session, model)
    }

    fn turn(user: &str, assistant: Option<&str>) -> Turn {
        Turn::new(user, assistant.map(str::to_string))
    }

    #[tokio::test]
    async fn test_exchange_with_empty_history() {
        let (session, model) = session_with(ScriptedModel::replying("Hi there!"));

        let outcome = session.exchange("Hello", Transcript::new()).await;

        assert_eq!(outcome.message, "");
        assert_eq!(
            outcome.history,
            Transcript::from(vec![turn("Hello", Some("Hi there!"))])
        );
        assert_eq!(model.request_count(), 1);
    }

    #[tokio::test]
    async fn test_exchange_appends_after_existing_turns() {
        let (session, model) = session_with(ScriptedModel::replying("Good!"));
        let history = Transcript::from(vec![turn("Hi", Some("Hello!"))]);

        let outcome = session.exchange("How are you?", history).await;

        assert_eq!(
            outcome.history,
            Transcript::from(vec![
                turn("Hi", Some("Hello!")),
                turn("How are you?", Some("Good!")),
            ])
        );

        let requests = model.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            vec![
                ChatMessage::new(SenderType::System, SYSTEM_PROMPT),
                ChatMessage::new(SenderType::User, "Hi"),
                ChatMessage::new(SenderType::Assistant, "Hello!"),
                ChatMessage::new(SenderType::User, "How are you?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_exchange_failure_becomes_error_turn() {
        let (session, model) = session_with(ScriptedModel::failing("timed out"));
        let history = Transcript::from(vec![turn("Hi", Some("Hello!"))]);

        let outcome = session.exchange("Still there?", history).await;

        assert_eq!(outcome.message, "");
        assert_eq!(outcome.history.len(), 2);
        let last = outcome.history.last().unwrap();
        assert_eq!(last.user(), "Still there?");
        assert_eq!(last.assistant(), Some("Error: timed out"));
        assert_eq!(model.request_count(), 1);
    }

    #[tokio::test]
    async fn test_exchange_keeps_reply_verbatim() {
        let reply = "  line one\n\nline two with trailing space ";
        let (session, _) = session_with(ScriptedModel::replying(reply));

        let outcome = session.exchange("", Transcript::new()).await;

        let last = outcome.history.last().unwrap();
        assert_eq!(last.user(), "");
        assert_eq!(last.assistant(), Some(reply));
    }

    #[test]
    fn test_build_messages_skips_absent_and_empty_texts() {
        let (session, _) = session_with(ScriptedModel::replying("unused"));
        let history = Transcript::from(vec![
            turn("first", Some("")),
            turn("second", None),
            turn("", Some("orphan reply")),
        ]);

        let messages = session.build_messages("last", &history);

        assert_eq!(
            messages,
            vec![
                ChatMessage::new(SenderType::System, SYSTEM_PROMPT),
                ChatMessage::new(SenderType::User, "first"),
                ChatMessage::new(SenderType::User, "second"),
                ChatMessage::new(SenderType::Assistant, "orphan reply"),
                ChatMessage::new(SenderType::User, "last"),
            ]
        );
    }

    #[test]
    fn test_build_messages_keeps_empty_new_message() {
        let (session, _) = session_with(ScriptedModel::replying("unused"));

        let messages = session.build_messages("", &Transcript::new());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], ChatMessage::new(SenderType::User, ""));
    }

    #[test]
    fn test_clear_returns_empty_state() {
        let outcome = Session::clear();
        assert_eq!(outcome.message, "");
        assert!(outcome.history.is_empty());
    }

    #[test]
    fn test_new_session_from_chat_config() {
        let chat_config = ChatConfig {
            model: crate::test_utils::dummy_model_config("gpt-4o-mini"),
            profile: ProfileConfig::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        };

        let session = Session::new(&chat_config).unwrap();
        assert_eq!(session.model_name(), "gpt-4o-mini");
    }
}
