//! Saved conversation snapshots and store errors.

use serde::{Deserialize, Serialize};

use crate::Message;

/// A named copy of a conversation and the remote thread it continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConversation {
    pub messages: Vec<Message>,
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("no saved conversation named '{0}'")]
    NotFound(String),
}
