//! In-memory fakes for the remote services.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::run::{Run, ThreadMessage};
use crate::tools::{Coordinates, CurrentWeather, TemperatureUnit, ToolError, WeatherApi};
use crate::{AiError, AssistantApi, AssistantSpec, RunSettings, ToolOutput};

/// Weather service returning fixed conditions and recording each request.
pub(crate) struct FakeWeather {
    temperature: f64,
    code: u32,
    geocoding_hits: bool,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeWeather {
    pub(crate) fn new(temperature: f64, code: u32) -> Self {
        Self {
            temperature,
            code,
            geocoding_hits: true,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn without_geocoding_hits(mut self) -> Self {
        self.geocoding_hits = false;
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherApi for FakeWeather {
    async fn geocode(&self, name: &str) -> Result<Option<Coordinates>, ToolError> {
        self.calls.lock().unwrap().push(format!("geocode:{name}"));
        if self.fail {
            return Err(ToolError::Upstream("connection refused".into()));
        }
        Ok(self.geocoding_hits.then_some(Coordinates {
            latitude: 37.566,
            longitude: 126.978,
        }))
    }

    async fn current(
        &self,
        _at: Coordinates,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather, ToolError> {
        let unit = match unit {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        };
        self.calls.lock().unwrap().push(format!("current:{unit}"));
        Ok(CurrentWeather {
            temperature: self.temperature,
            weather_code: self.code,
        })
    }
}

/// Build a run from its JSON wire form.
pub(crate) fn run_json(value: serde_json::Value) -> Run {
    serde_json::from_value(value).unwrap()
}

pub(crate) fn run_with_status(id: &str, status: &str) -> Run {
    run_json(json!({ "id": id, "status": status }))
}

/// A `requires_action` run asking for `calls` as `(id, name, arguments)`.
pub(crate) fn run_requiring(id: &str, calls: &[(&str, &str, &str)]) -> Run {
    let tool_calls: Vec<_> = calls
        .iter()
        .map(|(call_id, name, arguments)| {
            json!({
                "id": call_id,
                "type": "function",
                "function": { "name": name, "arguments": arguments }
            })
        })
        .collect();
    run_json(json!({
        "id": id,
        "status": "requires_action",
        "required_action": {
            "type": "submit_tool_outputs",
            "submit_tool_outputs": { "tool_calls": tool_calls }
        }
    }))
}

pub(crate) fn text_message(text: &str) -> ThreadMessage {
    serde_json::from_value(json!({
        "id": "msg_1",
        "role": "assistant",
        "content": [{ "type": "text", "text": { "value": text, "annotations": [] } }]
    }))
    .unwrap()
}

type ReplyFn = Box<dyn Fn(&[Vec<ToolOutput>]) -> ThreadMessage + Send + Sync>;

/// Assistant service that replays scripted runs and records every call.
pub(crate) struct ScriptedApi {
    /// Returned by `create_run`.
    initial: Mutex<Option<Run>>,
    /// Returned by successive `retrieve_run` calls; the last one repeats.
    polls: Mutex<VecDeque<Run>>,
    reply: ReplyFn,
    files: Mutex<Vec<(String, Vec<u8>)>>,
    fail_create_thread: bool,
    fail_submit: bool,
    pub(crate) log: Mutex<Vec<String>>,
    pub(crate) submissions: Mutex<Vec<Vec<ToolOutput>>>,
    pub(crate) run_settings: Mutex<Vec<RunSettings>>,
}

impl ScriptedApi {
    pub(crate) fn new(initial: Run, polls: Vec<Run>) -> Self {
        Self {
            initial: Mutex::new(Some(initial)),
            polls: Mutex::new(polls.into()),
            reply: Box::new(|_| text_message("ok")),
            files: Mutex::new(Vec::new()),
            fail_create_thread: false,
            fail_submit: false,
            log: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            run_settings: Mutex::new(Vec::new()),
        }
    }

    /// Build the latest message from every tool-output batch submitted so far.
    pub(crate) fn with_reply(
        mut self,
        reply: impl Fn(&[Vec<ToolOutput>]) -> ThreadMessage + Send + Sync + 'static,
    ) -> Self {
        self.reply = Box::new(reply);
        self
    }

    pub(crate) fn with_file(self, file_id: &str, bytes: Vec<u8>) -> Self {
        self.files
            .lock()
            .unwrap()
            .push((file_id.to_string(), bytes));
        self
    }

    pub(crate) fn failing_thread_creation(mut self) -> Self {
        self.fail_create_thread = true;
        self
    }

    pub(crate) fn failing_submissions(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    /// Queue the runs for the next interaction.
    pub(crate) fn script(&self, initial: Run, polls: Vec<Run>) {
        *self.initial.lock().unwrap() = Some(initial);
        *self.polls.lock().unwrap() = polls.into();
    }

    pub(crate) fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl AssistantApi for ScriptedApi {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String, AiError> {
        self.record(format!("create_assistant:{}", spec.model));
        Ok("asst_1".to_string())
    }

    async fn create_thread(&self) -> Result<String, AiError> {
        self.record("create_thread".to_string());
        if self.fail_create_thread {
            return Err(AiError::NetworkError("connection reset".into()));
        }
        let count = self.log().iter().filter(|e| *e == "create_thread").count();
        Ok(format!("thread_{count}"))
    }

    async fn add_message(&self, thread_id: &str, text: &str) -> Result<(), AiError> {
        self.record(format!("add_message:{thread_id}:{text}"));
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        settings: &RunSettings,
    ) -> Result<Run, AiError> {
        self.record(format!("create_run:{thread_id}:{assistant_id}"));
        self.run_settings.lock().unwrap().push(settings.clone());
        self.initial
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| AiError::ApiError("no scripted run".into()))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AiError> {
        self.record(format!("retrieve_run:{thread_id}:{run_id}"));
        let mut polls = self.polls.lock().unwrap();
        if polls.len() > 1 {
            Ok(polls.pop_front().unwrap())
        } else {
            polls
                .front()
                .cloned()
                .ok_or_else(|| AiError::ApiError("no scripted poll".into()))
        }
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run, AiError> {
        self.record(format!(
            "submit_tool_outputs:{thread_id}:{run_id}:{}",
            outputs.len()
        ));
        if self.fail_submit {
            return Err(AiError::NetworkError("broken pipe".into()));
        }
        self.submissions.lock().unwrap().push(outputs.to_vec());
        Ok(run_with_status(run_id, "queued"))
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AiError> {
        self.record(format!("cancel_run:{thread_id}:{run_id}"));
        Ok(run_with_status(run_id, "cancelling"))
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<ThreadMessage>, AiError> {
        self.record(format!("latest_message:{thread_id}"));
        let submissions = self.submissions.lock().unwrap();
        Ok(Some((self.reply)(&submissions)))
    }

    async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, AiError> {
        self.record(format!("file_content:{file_id}"));
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == file_id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| AiError::ApiError(format!("HTTP 404 Not Found: {file_id}")))
    }
}
