//! Fixed table of supported cities.

use chrono_tz::Tz;

/// A city the lookup tools know about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    /// Lowercase substring matched against user input.
    pub key: &'static str,
    /// Display name, also used for geocoding.
    pub name: &'static str,
    pub timezone: Tz,
}

pub const CITIES: &[City] = &[
    City {
        key: "tokyo",
        name: "Tokyo",
        timezone: chrono_tz::Asia::Tokyo,
    },
    City {
        key: "san francisco",
        name: "San Francisco",
        timezone: chrono_tz::America::Los_Angeles,
    },
    City {
        key: "paris",
        name: "Paris",
        timezone: chrono_tz::Europe::Paris,
    },
    City {
        key: "seoul",
        name: "Seoul",
        timezone: chrono_tz::Asia::Seoul,
    },
];

/// First city whose key occurs in `location`, ignoring case.
pub fn find_city(location: &str) -> Option<&'static City> {
    let lower = location.to_lowercase();
    CITIES.iter().find(|city| lower.contains(city.key))
}
