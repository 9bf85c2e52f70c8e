//! # Constants and type definitions for launchwx
//!
//! This module centralizes the **column names**, **scoring thresholds**, **unit aliases**
//! and the **built-in launch-site table** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit type aliases for weather quantities and geographic coordinates
//! - Input and output column names of the tabular artifacts
//! - Wind/precipitation thresholds for the quality score and the extreme-weather flag
//! - Known launch sites and their coordinates, in registry order
//!
//! The quality-score thresholds and the extreme-weather thresholds are two independent
//! sets; they must not be merged.

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in decimal degrees
pub type Degree = f64;

/// Temperature in degrees Celsius
pub type Celsius = f64;

/// Speed in kilometers per hour
pub type KmPerHour = f64;

/// Precipitation height in millimeters
pub type Millimeter = f64;

/// Relative humidity in percent
pub type Percent = f64;

// -------------------------------------------------------------------------------------------------
// Input columns
// -------------------------------------------------------------------------------------------------

pub const COL_LOCATION: &str = "Location";
pub const COL_DETAIL: &str = "Detail";
pub const COL_DATUM: &str = "Datum";
pub const COL_STATUS_MISSION: &str = "Status Mission";

/// Raw price column name, compared after trimming (the dataset ships it as `" Rocket"`).
pub const COL_RAW_PRICE: &str = "Rocket";

/// Index columns left behind by a previous dataframe export.
pub const INDEX_ARTIFACT_COLUMNS: [&str; 1] = ["Unnamed: 0"];

// -------------------------------------------------------------------------------------------------
// Output columns
// -------------------------------------------------------------------------------------------------

pub const COL_ROCKET_MODEL: &str = "RocketModel";
pub const COL_PAYLOAD: &str = "Payload";
pub const COL_LAUNCH_PRICE: &str = "LaunchPriceM";
pub const COL_LAUNCH_DATE: &str = "LaunchDate";
pub const COL_MISSION_SUCCESS: &str = "MissionSuccess";
pub const COL_MISSION_SUCCESS_PROB: &str = "MissionSuccessProb";
pub const COL_TEMPERATURE: &str = "temperature_c";
pub const COL_WINDSPEED: &str = "windspeed_kmh";
pub const COL_PRECIPITATION: &str = "precipitation_mm";
pub const COL_HUMIDITY: &str = "humidity_percent";
pub const COL_WEATHER_SOURCE: &str = "weather_source";
pub const COL_LAUNCH_YEAR: &str = "LaunchYear";
pub const COL_LAUNCH_DECADE: &str = "LaunchDecade";
pub const COL_SEASON: &str = "Season";
pub const COL_LAUNCH_ERA: &str = "LaunchEra";
pub const COL_WEATHER_QUALITY: &str = "WeatherQualityScore";
pub const COL_EXTREME_WEATHER: &str = "IsExtremeWeather";

/// Date-time layout of the `LaunchDate` output column.
pub const LAUNCH_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// -------------------------------------------------------------------------------------------------
// Weather quality score thresholds (strict `>` comparisons)
// -------------------------------------------------------------------------------------------------

pub const WIND_SEVERE_KMH: KmPerHour = 40.0;
pub const WIND_STRONG_KMH: KmPerHour = 30.0;
pub const WIND_MODERATE_KMH: KmPerHour = 20.0;

pub const WIND_SEVERE_FACTOR: f64 = 0.3;
pub const WIND_STRONG_FACTOR: f64 = 0.6;
pub const WIND_MODERATE_FACTOR: f64 = 0.8;

pub const PRECIP_HEAVY_MM: Millimeter = 5.0;
pub const PRECIP_MODERATE_MM: Millimeter = 2.0;

pub const PRECIP_HEAVY_FACTOR: f64 = 0.3;
pub const PRECIP_MODERATE_FACTOR: f64 = 0.7;

// -------------------------------------------------------------------------------------------------
// Extreme weather thresholds (strict `>` comparisons)
// -------------------------------------------------------------------------------------------------

pub const EXTREME_WIND_KMH: KmPerHour = 50.0;
pub const EXTREME_PRECIP_MM: Millimeter = 10.0;

// -------------------------------------------------------------------------------------------------
// Launch sites
// -------------------------------------------------------------------------------------------------

/// Known launch sites as `(name, latitude, longitude)`.
///
/// Order matters: resolution is first-match-wins over this list.
pub const KNOWN_LAUNCH_SITES: [(&str, Degree, Degree); 12] = [
    ("Cape Canaveral", 28.3922, -80.6077),
    ("Kennedy Space Center", 28.5729, -80.6490),
    ("Vandenberg AFB", 34.7420, -120.5724),
    ("Vandenberg SFB", 34.7420, -120.5724),
    ("Baikonur Cosmodrome", 45.9650, 63.3050),
    ("Kourou", 5.2380, -52.7680),
    ("Xichang", 28.2460, 102.0269),
    ("Jiuquan", 40.9675, 100.2783),
    ("Tanegashima", 30.4010, 130.9700),
    ("Sriharikota", 13.7199, 80.2304),
    ("Plesetsk", 62.9257, 40.5773),
    ("Wallops Island", 37.9339, -75.4664),
];

/// Decimal places kept on coordinates when building weather cache keys.
pub const CACHE_COORD_DECIMALS: i32 = 4;

/// Default number of records between two progress reports.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;
