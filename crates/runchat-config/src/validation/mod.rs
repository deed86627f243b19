//! Full configuration validation.
//!
//! Checks numeric ranges and endpoint shapes, collecting every problem
//! into a single `ConfigError`.

mod helpers;


use crate::schema::RunchatConfig;
use runchat_common::ConfigError;

use helpers::{validate_range_f64, validate_range_u64, validate_url};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RunchatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_assistant(&mut errors, config);
    validate_polling(&mut errors, config);
    validate_weather(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_assistant(errors: &mut Vec<String>, config: &RunchatConfig) {
    if config.assistant.model.trim().is_empty() {
        errors.push("assistant.model must not be empty".to_string());
    }
    validate_range_f64(
        errors,
        "assistant.temperature",
        config.assistant.temperature,
        0.0,
        2.0,
    );
    validate_range_f64(errors, "assistant.top_p", config.assistant.top_p, 0.0, 1.0);
}

fn validate_polling(errors: &mut Vec<String>, config: &RunchatConfig) {
    validate_range_u64(
        errors,
        "polling.interval_ms",
        config.polling.interval_ms,
        1,
        60_000,
    );
    validate_range_u64(
        errors,
        "polling.timeout_secs",
        config.polling.timeout_secs,
        1,
        3_600,
    );
    if config.polling.timeout_secs.saturating_mul(1000) < config.polling.interval_ms {
        errors.push(format!(
            "polling.timeout_secs = {} is shorter than one poll interval ({} ms)",
            config.polling.timeout_secs, config.polling.interval_ms
        ));
    }
}

fn validate_weather(errors: &mut Vec<String>, config: &RunchatConfig) {
    validate_url(errors, "weather.geocoding_url", &config.weather.geocoding_url);
    validate_url(errors, "weather.forecast_url", &config.weather.forecast_url);
    validate_range_u64(
        errors,
        "weather.request_timeout_secs",
        config.weather.request_timeout_secs,
        1,
        120,
    );
}
