//! `get_current_weather`: geocode a supported city, then read its current
//! conditions from Open-Meteo.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::cities::find_city;
use super::registry::ToolError;

/// Temperature unit requested by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Lenient parse: anything but "fahrenheit" means Celsius.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(s) if s.eq_ignore_ascii_case("fahrenheit") => TemperatureUnit::Fahrenheit,
            _ => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// Coarse description derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherBucket {
    Clear,
    Cloudy,
    RainOrSnow,
}

impl WeatherBucket {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => WeatherBucket::Clear,
            1..=9 => WeatherBucket::Cloudy,
            _ => WeatherBucket::RainOrSnow,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WeatherBucket::Clear => "clear",
            WeatherBucket::Cloudy => "cloudy",
            WeatherBucket::RainOrSnow => "rain/snow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    pub weather_code: u32,
}

/// The two outbound lookups behind the weather tool.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// First geocoding hit for `name`, or `None` when the service knows no such place.
    async fn geocode(&self, name: &str) -> Result<Option<Coordinates>, ToolError>;

    async fn current(
        &self,
        at: Coordinates,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather, ToolError>;
}

/// Current weather for `location` as the tool's JSON result.
///
/// Issues no request for unsupported cities and exactly two (geocode,
/// forecast) for supported ones. Lookup misses are reported as
/// `temperature: "unknown"`; transport failures as `Err`.
pub async fn current_weather(
    api: &dyn WeatherApi,
    location: &str,
    unit: TemperatureUnit,
) -> Result<Value, ToolError> {
    let unknown = || json!({ "location": location, "temperature": "unknown" });

    let Some(city) = find_city(location) else {
        return Ok(unknown());
    };
    let Some(coords) = api.geocode(city.key).await? else {
        return Ok(unknown());
    };
    let current = api.current(coords, unit).await?;

    Ok(json!({
        "location": city.name,
        "temperature": current.temperature,
        "unit": unit.symbol(),
        "description": WeatherBucket::from_code(current.weather_code).description(),
    }))
}

#[derive(Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<Coordinates>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current: CurrentWeather,
}

/// Open-Meteo geocoding and forecast client.
pub struct OpenMeteoClient {
    geocoding_url: String,
    forecast_url: String,
    http: reqwest::Client,
}

impl OpenMeteoClient {
    pub fn new(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::Upstream(e.to_string()))?;
        Ok(Self {
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
            http,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ToolError> {
        let response = request
            .send()
            .await
            .map_err(|e| ToolError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Upstream(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ToolError::Upstream(format!("invalid response: {e}")))
    }
}

#[async_trait]
impl WeatherApi for OpenMeteoClient {
    async fn geocode(&self, name: &str) -> Result<Option<Coordinates>, ToolError> {
        debug!(name, "Geocoding request");
        let request = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", name), ("count", "1")]);
        let body: GeocodingResponse = self.get_json(request).await?;
        Ok(body.results.into_iter().next())
    }

    async fn current(
        &self,
        at: Coordinates,
        unit: TemperatureUnit,
    ) -> Result<CurrentWeather, ToolError> {
        debug!(lat = at.latitude, lon = at.longitude, "Forecast request");
        let mut query = vec![
            ("latitude", at.latitude.to_string()),
            ("longitude", at.longitude.to_string()),
            ("current", "temperature_2m,weather_code".to_string()),
        ];
        if unit == TemperatureUnit::Fahrenheit {
            query.push(("temperature_unit", "fahrenheit".to_string()));
        }
        let request = self.http.get(&self.forecast_url).query(&query);
        let body: ForecastResponse = self.get_json(request).await?;
        Ok(body.current)
    }
}
