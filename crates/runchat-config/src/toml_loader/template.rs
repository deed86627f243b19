//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# runchat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# Credentials are read from the environment (AZURE_OPENAI_ENDPOINT,
# AZURE_OPENAI_API_KEY, optional AZURE_SEARCH_*), never from this file.

[assistant]
# name = "날씨+그래프 봇"
# model = "gpt-4o-mini"     # deployment name
# temperature = 1.0         # 0.0-2.0
# top_p = 1.0               # 0.0-1.0
# code_interpreter = true

[polling]
# interval_ms = 500
# timeout_secs = 120

[weather]
# geocoding_url = "https://geocoding-api.open-meteo.com/v1/search"
# forecast_url = "https://api.open-meteo.com/v1/forecast"
# request_timeout_secs = 10

[output]
# image_dir = "runchat-images"

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
