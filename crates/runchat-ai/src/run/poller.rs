//! Drives one remote run to a terminal state, answering tool calls on the way.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::tools::ToolRegistry;
use crate::{AiError, AssistantApi};

use super::types::{Run, RunStatus};
use super::wait::{wait_tick, PollPolicy, Tick};

/// How a polled run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(Run),
    /// Terminal status other than `completed` (failed, cancelled, expired, ...).
    Ended(Run),
    /// The poll deadline passed while the run was still active.
    TimedOut(Run),
    /// The caller cancelled the wait.
    Cancelled(Run),
}

impl RunOutcome {
    /// Convert every non-completed outcome into the matching error.
    pub fn into_completed(self) -> Result<Run, AiError> {
        match self {
            RunOutcome::Completed(run) => Ok(run),
            RunOutcome::Ended(run) => Err(AiError::RunEnded {
                status: run.status.to_string(),
                detail: run.failure_detail(),
            }),
            RunOutcome::TimedOut(_) => Err(AiError::Timeout),
            RunOutcome::Cancelled(_) => Err(AiError::Cancelled),
        }
    }
}

/// Polls a run at a fixed interval and dispatches requested tool calls.
pub struct RunPoller<'a> {
    api: &'a dyn AssistantApi,
    tools: &'a ToolRegistry,
    policy: PollPolicy,
}

impl<'a> RunPoller<'a> {
    pub fn new(api: &'a dyn AssistantApi, tools: &'a ToolRegistry, policy: PollPolicy) -> Self {
        Self { api, tools, policy }
    }

    /// Poll `run` until it leaves the active states, the deadline passes,
    /// or `cancel` fires.
    ///
    /// Every `requires_action` stage is answered with one batch holding one
    /// output per pending call, in call order. Transport errors cancel the
    /// remote run best-effort and are returned as `Err`; remote run failures
    /// are reported through [`RunOutcome`].
    pub async fn drive(
        &self,
        thread_id: &str,
        mut run: Run,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, AiError> {
        let deadline = self.policy.deadline_from(Instant::now());

        while run.status.is_active() {
            match wait_tick(self.policy.interval, deadline, cancel).await {
                Tick::Ready => {}
                Tick::TimedOut => {
                    warn!(run_id = %run.id, status = %run.status, "Run timed out");
                    self.cancel_quietly(thread_id, &run.id).await;
                    return Ok(RunOutcome::TimedOut(run));
                }
                Tick::Cancelled => {
                    info!(run_id = %run.id, "Run cancelled by user");
                    self.cancel_quietly(thread_id, &run.id).await;
                    return Ok(RunOutcome::Cancelled(run));
                }
            }

            let polled = self.api.retrieve_run(thread_id, &run.id).await;
            run = self.or_cancel(thread_id, &run.id, polled).await?;
            debug!(run_id = %run.id, status = %run.status, "Run polled");

            if run.status == RunStatus::RequiresAction {
                let calls = run.pending_tool_calls();
                if calls.is_empty() {
                    warn!(run_id = %run.id, "requires_action without tool calls");
                    continue;
                }
                let outputs = self.tools.dispatch_all(&calls).await;
                debug!(run_id = %run.id, count = outputs.len(), "Submitting tool outputs");
                let submitted = self
                    .api
                    .submit_tool_outputs(thread_id, &run.id, &outputs)
                    .await;
                run = self.or_cancel(thread_id, &run.id, submitted).await?;
            }
        }

        if run.status == RunStatus::Completed {
            Ok(RunOutcome::Completed(run))
        } else {
            warn!(run_id = %run.id, status = %run.status, "Run ended without completing");
            Ok(RunOutcome::Ended(run))
        }
    }

    /// Pass `result` through, cancelling the remote run first when it is an
    /// error. An active run would block new messages on the thread.
    async fn or_cancel(
        &self,
        thread_id: &str,
        run_id: &str,
        result: Result<Run, AiError>,
    ) -> Result<Run, AiError> {
        if let Err(ref e) = result {
            warn!(run_id, error = %e, "Polling failed, cancelling run");
            self.cancel_quietly(thread_id, run_id).await;
        }
        result
    }

    async fn cancel_quietly(&self, thread_id: &str, run_id: &str) {
        if let Err(e) = self.api.cancel_run(thread_id, run_id).await {
            warn!(run_id, error = %e, "Failed to cancel remote run");
        }
    }
}
