//! Local functions the remote assistant may call.
//!
//! The capability set is closed: [`ToolName`] lists every function,
//! [`ToolRegistry`] decodes arguments and dispatches to the typed handler.

mod cities;
mod definitions;
mod registry;
mod time;
mod weather;

pub use cities::{find_city, City, CITIES};
pub use definitions::{builtin_tools, to_assistant_tool};
pub use registry::{Clock, ToolError, ToolName, ToolRegistry};
pub use time::current_time_at;
pub use weather::{
    current_weather, Coordinates, CurrentWeather, OpenMeteoClient, TemperatureUnit, WeatherApi,
    WeatherBucket,
};
