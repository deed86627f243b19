//! Async exchange for ChatSession: one user message in, one reply out.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::render::{render_message, RenderedReply};
use crate::run::RunPoller;
use crate::{AiError, Message, TokenUsage};
use runchat_common::short_id;

use super::manager::ChatSession;

impl ChatSession {
    /// Send a user message and record the assistant's reply.
    ///
    /// Never fails: a failed, timed-out or cancelled run, and any transport
    /// error, is recorded as a `Failure` message instead. Returns the
    /// message that was appended.
    pub async fn send(&mut self, text: &str, cancel: &CancellationToken) -> &Message {
        let tag = short_id();
        self.store.push(Message::user(text));

        let reply = match self.exchange(&tag, text, cancel).await {
            Ok(reply) => {
                info!(
                    tag = %tag,
                    chars = reply.text.len(),
                    images = reply.images.len(),
                    "Assistant replied"
                );
                Message::assistant(reply.text, reply.images)
            }
            Err(e) => {
                warn!(tag = %tag, error = %e, "Exchange failed");
                Message::failure(failure_text(&e))
            }
        };

        self.store.push(reply);
        let messages = self.store.messages();
        &messages[messages.len() - 1]
    }

    async fn exchange(
        &mut self,
        tag: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<RenderedReply, AiError> {
        let api = Arc::clone(&self.api);
        let assistant_id = self.ensure_assistant().await?;
        let thread_id = self.ensure_thread().await?;

        api.add_message(&thread_id, text).await?;
        let run = api
            .create_run(&thread_id, &assistant_id, &self.settings)
            .await?;
        debug!(tag, thread_id, run_id = %run.id, status = %run.status, "Run created");

        let outcome = RunPoller::new(api.as_ref(), &self.tools, self.policy)
            .drive(&thread_id, run, cancel)
            .await?;
        let run = outcome.into_completed()?;

        if let Some(ref usage) = run.usage {
            let model = run.model.as_deref().unwrap_or(&self.spec.model);
            self.tracker.record(model, &TokenUsage::from(usage));
        }

        let message = api
            .latest_message(&thread_id)
            .await?
            .ok_or_else(|| AiError::ParseError("thread has no messages".into()))?;
        Ok(render_message(api.as_ref(), &message).await)
    }

    async fn ensure_assistant(&mut self) -> Result<String, AiError> {
        if let Some(ref id) = self.assistant_id {
            return Ok(id.clone());
        }
        let id = self.api.create_assistant(&self.spec).await?;
        info!(assistant_id = %id, model = %self.spec.model, "Assistant created");
        self.assistant_id = Some(id.clone());
        Ok(id)
    }

    async fn ensure_thread(&mut self) -> Result<String, AiError> {
        if let Some(id) = self.store.thread_id() {
            return Ok(id.to_string());
        }
        let id = self.api.create_thread().await?;
        info!(thread_id = %id, "Thread created");
        self.store.set_thread_id(id.clone());
        Ok(id)
    }
}

/// User-visible explanation of why no reply was produced.
fn failure_text(error: &AiError) -> String {
    match error {
        AiError::Timeout => "timed out waiting for a reply; please try again".to_string(),
        AiError::Cancelled => "request cancelled".to_string(),
        AiError::RunEnded { status, detail } => {
            format!("run ended with status '{status}': {detail}")
        }
        AiError::RateLimited => "rate limited by the service; please retry shortly".to_string(),
        other => format!("request failed: {other}"),
    }
}
