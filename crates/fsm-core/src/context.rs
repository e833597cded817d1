use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    /// State the machine was in when this entry was recorded.
    pub state: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            state: state.into(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            state: state.into(),
            created_at: Utc::now(),
        }
    }
}

/// Mutable record of one conversation: current state pointer plus ordered
/// history. Owned exclusively by one machine instance and mutated only by
/// its run engine, never concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    pub id: String,
    pub current_state: String,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(initial_state: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            current_state: initial_state.into(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.updated_at = Utc::now();
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.current_state = state.into();
        self.updated_at = Utc::now();
    }

    /// The most recent `window` entries, or the full history when `window`
    /// is `None`.
    pub fn recent(&self, window: Option<usize>) -> &[HistoryEntry] {
        match window {
            Some(n) if self.history.len() > n => &self.history[self.history.len() - n..],
            _ => &self.history,
        }
    }
}
