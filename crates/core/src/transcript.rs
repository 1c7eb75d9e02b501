//! The conversation as the page sees it: an append-only list of turns.
use serde::{Deserialize, Serialize};

/// One exchange between the user and the assistant.
///
/// Serialized as a two element array `[user, assistant]` where the assistant
/// side is `null` while a reply is still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Option<String>)", into = "(String, Option<String>)")]
pub struct Turn {
    user: String,
    assistant: Option<String>,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: Option<String>) -> Self {
        Self {
            user: user.into(),
            assistant,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn assistant(&self) -> Option<&str> {
        self.assistant.as_deref()
    }
}

impl From<(String, Option<String>)> for Turn {
    fn from((user, assistant): (String, Option<String>)) -> Self {
        Self { user, assistant }
    }
}

impl From<Turn> for (String, Option<String>) {
    fn from(turn: Turn) -> Self {
        (turn.user, turn.assistant)
    }
}

/// Ordered turns of a single session, oldest first.
///
/// Turns can only be appended; existing entries are never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
