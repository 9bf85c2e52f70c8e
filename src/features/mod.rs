//! # Derived features
//!
//! Pure, per-record computation of the engineered model inputs from a launch date and
//! its [`WeatherObservation`]:
//!
//! | feature | rule | absent date |
//! |---------|------|-------------|
//! | `LaunchYear` | calendar year | absent |
//! | `LaunchDecade` | `floor(year/10)*10` | absent |
//! | `Season` | month grouping, see [`Season::from_month`] | `Unknown` |
//! | `LaunchEra` | year buckets, see [`LaunchEra::from_year`] | `Unknown` |
//! | `WeatherQualityScore` | see [`weather_quality`] | n/a |
//! | `IsExtremeWeather` | see [`weather_quality`] | n/a |
//!
//! No feature depends on another record.

pub mod temporal;
pub mod weather_quality;

use chrono::{Datelike, NaiveDateTime};

use crate::weather::WeatherObservation;

pub use temporal::{launch_decade, LaunchEra, Season};
pub use weather_quality::{is_extreme_weather, weather_quality_score};

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatures {
    pub launch_year: Option<i32>,
    pub launch_decade: Option<i32>,
    pub season: Season,
    pub launch_era: LaunchEra,
    pub weather_quality_score: f64,
    pub is_extreme_weather: bool,
}

/// Compute every derived feature of one launch.
pub fn derive_features(
    launch_date: Option<NaiveDateTime>,
    weather: &WeatherObservation,
) -> DerivedFeatures {
    let launch_year = launch_date.map(|d| d.year());

    DerivedFeatures {
        launch_year,
        launch_decade: launch_year.map(launch_decade),
        season: launch_date.map_or(Season::Unknown, |d| Season::from_month(d.month())),
        launch_era: launch_year.map_or(LaunchEra::Unknown, LaunchEra::from_year),
        weather_quality_score: weather_quality_score(
            weather.windspeed_kmh,
            weather.precipitation_mm,
        ),
        is_extreme_weather: is_extreme_weather(weather.windspeed_kmh, weather.precipitation_mm),
    }
}
