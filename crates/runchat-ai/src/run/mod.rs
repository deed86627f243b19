//! Remote run lifecycle: wire types, polling, and tool-call answering.

mod poller;
mod types;
mod wait;


pub use poller::{RunOutcome, RunPoller};
pub use types::{
    ContentBlock, ImageFileRef, RemoteFunction, RemoteToolCall, RequiredAction, Run, RunError,
    RunSettings, RunStatus, RunUsage, SubmitToolOutputs, TextContent, ThreadMessage,
};
pub(crate) use types::ListResponse;
pub use wait::{wait_tick, PollPolicy, Tick};
