//! Active conversation plus its saved snapshots.

use std::collections::BTreeMap;

use tracing::debug;

use crate::Message;

use super::types::{SavedConversation, StoreError};

/// Messages of the active conversation, the thread they belong to, and
/// snapshots saved by title.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    thread_id: Option<String>,
    saved: BTreeMap<String, SavedConversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn set_thread_id(&mut self, thread_id: impl Into<String>) {
        self.thread_id = Some(thread_id.into());
    }

    /// Save a deep copy of the active conversation under `title`, replacing
    /// any snapshot with the same title.
    pub fn save(&mut self, title: &str) -> Result<(), StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let snapshot = SavedConversation {
            messages: self.messages.clone(),
            thread_id: self.thread_id.clone(),
        };
        debug!(title, messages = snapshot.messages.len(), "Saving conversation");
        self.saved.insert(title.to_string(), snapshot);
        Ok(())
    }

    /// Replace the active messages and thread with a saved snapshot.
    /// An unknown title leaves the active conversation untouched.
    pub fn load(&mut self, title: &str) -> Result<(), StoreError> {
        let title = title.trim();
        let snapshot = self
            .saved
            .get(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
        self.messages = snapshot.messages.clone();
        self.thread_id = snapshot.thread_id.clone();
        debug!(title, messages = self.messages.len(), "Loaded conversation");
        Ok(())
    }

    pub fn delete(&mut self, title: &str) -> Result<(), StoreError> {
        let title = title.trim();
        self.saved
            .remove(title)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(title.to_string()))
    }

    /// Saved titles in sorted order.
    pub fn titles(&self) -> Vec<&str> {
        self.saved.keys().map(String::as_str).collect()
    }

    /// Start a new conversation. Saved snapshots are kept.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.thread_id = None;
    }
}
