//! Assistant engine for runchat.
//!
//! Bridges a hosted assistant service to local callbacks:
//! - Remote session client for the Assistants REST API
//! - Run polling with a cancellable, timeout-bounded wait
//! - Tool dispatch through a closed registry (weather, local time)
//! - Rendering of text and image content
//! - Per-session conversation state with named snapshots
//! - Token usage tracking

pub mod assistants;
pub mod render;
pub mod run;
pub mod session;
pub mod token_tracker;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use assistants::{AssistantSpec, AssistantTool, AssistantsClient, AssistantsConfig, DataSource};
pub use render::{render_message, RenderedReply};
pub use run::{PollPolicy, Run, RunOutcome, RunPoller, RunSettings, RunStatus, ThreadMessage};
pub use session::{ChatSession, ConversationStore, SavedConversation, StoreError};
pub use token_tracker::TokenTracker;
pub use tools::{OpenMeteoClient, ToolName, ToolRegistry, WeatherApi};

/// Operations of the hosted assistant service used by a chat session.
///
/// [`AssistantsClient`] talks to the real service; tests script their own.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an assistant and return its id.
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String, AiError>;

    /// Create an empty thread and return its id.
    async fn create_thread(&self) -> Result<String, AiError>;

    /// Append a user message to a thread.
    async fn add_message(&self, thread_id: &str, text: &str) -> Result<(), AiError>;

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        settings: &RunSettings,
    ) -> Result<Run, AiError>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AiError>;

    /// Answer every pending tool call of a run in one batch.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AiError>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AiError>;

    /// The newest message of a thread, if any.
    async fn latest_message(&self, thread_id: &str) -> Result<Option<ThreadMessage>, AiError>;

    /// Raw bytes of an uploaded or generated file.
    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, AiError>;
}

/// One entry of the local conversation history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub kind: MessageKind,
    pub text: String,
    /// PNG-encoded images attached to the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Vec<u8>>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            kind: MessageKind::Reply,
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>, images: Vec<Vec<u8>>) -> Self {
        Self {
            role: Role::Assistant,
            kind: MessageKind::Reply,
            text: text.into(),
            images,
        }
    }

    /// An assistant-role message reporting that no reply could be produced.
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            kind: MessageKind::Failure,
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == MessageKind::Failure
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Reply,
    Failure,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A function call requested by a run in `requires_action`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded argument object, exactly as sent by the service.
    pub arguments: String,
}

/// The answer to one [`ToolCall`], matched by id.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolOutput {
    pub tool_call_id: String,
    /// JSON-encoded result object.
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timed out waiting for the assistant")]
    Timeout,
    #[error("Cancelled")]
    Cancelled,
    #[error("Run ended with status {status}: {detail}")]
    RunEnded { status: String, detail: String },
}
