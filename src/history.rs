//! In-memory conversation logs for multi-turn chat.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::llm::ChatMessage;

/// One append-only conversation log.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
}

/// Store of conversations keyed by id. Messages are only ever appended;
/// there is no eviction or truncation.
///
/// Individual appends on one conversation are serialized by the map's
/// per-entry locking, but a multi-turn exchange spans two appends with a
/// network call between them, so a single conversation expects one
/// caller at a time.
#[derive(Clone, Default)]
pub struct ConversationStore {
    conversations: Arc<DashMap<String, Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Conversation {
        let now = Utc::now();
        let conversation = Conversation {
            id: format!("conv_{}", Uuid::new_v4().simple()),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        };
        self.conversations
            .insert(conversation.id.clone(), conversation.clone());
        conversation
    }

    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.conversations.get(id).map(|entry| entry.clone())
    }

    /// Append a message; `None` when the conversation is unknown.
    pub fn append(&self, id: &str, message: ChatMessage) -> Option<()> {
        let mut entry = self.conversations.get_mut(id)?;
        entry.messages.push(message);
        entry.updated_at = Utc::now();
        Some(())
    }

    /// Snapshot of a conversation's messages in append order.
    pub fn messages(&self, id: &str) -> Option<Vec<ChatMessage>> {
        self.conversations
            .get(id)
            .map(|entry| entry.messages.clone())
    }
}
