//! `get_current_time`: local wall-clock time of a supported city.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::cities::find_city;

const TIME_FORMAT: &str = "%Y년 %m월 %d일 %p %I:%M";

/// Local time in `location` at the instant `now`.
///
/// Unknown cities yield `current_time: "unknown"` rather than an error.
pub fn current_time_at(location: &str, now: DateTime<Utc>) -> Value {
    match find_city(location) {
        Some(city) => {
            let local = now.with_timezone(&city.timezone);
            json!({
                "location": city.name,
                "current_time": local.format(TIME_FORMAT).to_string(),
            })
        }
        None => json!({
            "location": location,
            "current_time": "unknown",
        }),
    }
}
