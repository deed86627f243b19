//! Conversation session management.
//!
//! A `ChatSession` owns the remote assistant handle, the tool registry and
//! the local conversation state, and drives one exchange per user message.
//! Named snapshots of the conversation live in a `ConversationStore`.

mod chat;
mod manager;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use manager::ChatSession;
pub use store::ConversationStore;
pub use types::{SavedConversation, StoreError};
