//! Name-to-handler dispatch for tool calls.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{ToolCall, ToolOutput};

use super::time::current_time_at;
use super::weather::{current_weather, TemperatureUnit, WeatherApi};

/// Source of the current instant for time lookups.
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Every function the assistant may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    CurrentWeather,
    CurrentTime,
}

impl ToolName {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CurrentWeather => "get_current_weather",
            ToolName::CurrentTime => "get_current_time",
        }
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_current_weather" => Ok(ToolName::CurrentWeather),
            "get_current_time" => Ok(ToolName::CurrentTime),
            other => Err(ToolError::UnknownFunction(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown function")]
    UnknownFunction(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("upstream service error: {0}")]
    Upstream(String),
}

impl ToolError {
    /// The JSON object reported to the run in place of a result.
    pub fn to_output(&self) -> Value {
        match self {
            ToolError::UnknownFunction(name) => json!({
                "error": self.to_string(),
                "name": name,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

#[derive(Deserialize)]
struct WeatherArgs {
    location: String,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Deserialize)]
struct TimeArgs {
    location: String,
}

/// Dispatches tool calls to their typed handlers.
pub struct ToolRegistry {
    weather: Arc<dyn WeatherApi>,
    clock: Clock,
}

impl ToolRegistry {
    pub fn new(weather: Arc<dyn WeatherApi>) -> Self {
        Self {
            weather,
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Answer one call. Never fails: every problem becomes an `{error}` output
    /// carrying the call's id.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutput {
        debug!(tool = %call.name, id = %call.id, "Executing tool");
        let value = match self.execute(call).await {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %call.name, id = %call.id, error = %e, "Tool call failed");
                e.to_output()
            }
        };
        ToolOutput {
            tool_call_id: call.id.clone(),
            output: value.to_string(),
        }
    }

    /// Answer a whole `requires_action` stage; outputs keep the order of `calls`.
    pub async fn dispatch_all(&self, calls: &[ToolCall]) -> Vec<ToolOutput> {
        join_all(calls.iter().map(|call| self.dispatch(call))).await
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        match call.name.parse::<ToolName>()? {
            ToolName::CurrentWeather => {
                let args: WeatherArgs = decode_args(&call.arguments)?;
                let unit = TemperatureUnit::from_arg(args.unit.as_deref());
                current_weather(self.weather.as_ref(), &args.location, unit).await
            }
            ToolName::CurrentTime => {
                let args: TimeArgs = decode_args(&call.arguments)?;
                Ok(current_time_at(&args.location, (self.clock)()))
            }
        }
    }
}

fn decode_args<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, ToolError> {
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
