//! ChatSession struct and conversation management.

use std::sync::Arc;

use crate::run::{PollPolicy, RunSettings};
use super::store::ConversationStore;
use crate::token_tracker::TokenTracker;
use crate::tools::ToolRegistry;
use crate::{AssistantApi, AssistantSpec, Message};
use runchat_common::SessionId;

use super::types::StoreError;

/// One user's chat with the hosted assistant.
pub struct ChatSession {
    pub(super) id: SessionId,
    pub(super) api: Arc<dyn AssistantApi>,
    pub(super) tools: ToolRegistry,
    /// Definition used to create the assistant on first use.
    pub(super) spec: AssistantSpec,
    pub(super) settings: RunSettings,
    pub(super) policy: PollPolicy,
    /// Remote assistant id, created lazily.
    pub(super) assistant_id: Option<String>,
    pub(super) store: ConversationStore,
    pub(super) tracker: TokenTracker,
}

impl ChatSession {
    pub fn new(api: Arc<dyn AssistantApi>, tools: ToolRegistry, spec: AssistantSpec) -> Self {
        Self {
            id: SessionId::new(),
            api,
            tools,
            spec,
            settings: RunSettings::default(),
            policy: PollPolicy::default(),
            assistant_id: None,
            store: ConversationStore::new(),
            tracker: TokenTracker::new(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.store.thread_id()
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Override the sampling temperature for subsequent runs.
    pub fn set_temperature(&mut self, temperature: f64) {
        self.settings.temperature = Some(temperature);
    }

    pub fn set_top_p(&mut self, top_p: f64) {
        self.settings.top_p = Some(top_p);
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    /// Forget the active conversation; the next message opens a new thread.
    pub fn new_chat(&mut self) {
        tracing::info!(session = %self.id, "Starting new chat");
        self.store.reset();
    }

    pub fn save(&mut self, title: &str) -> Result<(), StoreError> {
        self.store.save(title)
    }

    pub fn load(&mut self, title: &str) -> Result<(), StoreError> {
        self.store.load(title)
    }

    pub fn delete(&mut self, title: &str) -> Result<(), StoreError> {
        self.store.delete(title)
    }

    pub fn saved_titles(&self) -> Vec<&str> {
        self.store.titles()
    }
}
