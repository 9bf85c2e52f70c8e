//! # Enriched launch dataset
//!
//! The terminal artifact of the pipeline: each cleaned launch record joined with its
//! weather observation and derived features, written as one flat CSV file.
//!
//! ## Column layout
//!
//! ```text
//! <input columns, index column dropped, price column renamed LaunchPriceM in place>
//! RocketModel, Payload, [LaunchPriceM when the input had no price column],
//! LaunchDate, MissionSuccess, MissionSuccessProb,
//! temperature_c, windspeed_kmh, precipitation_mm, humidity_percent, weather_source,
//! LaunchYear, LaunchDecade, Season, LaunchEra, WeatherQualityScore, IsExtremeWeather
//! ```
//!
//! ## Cell encoding
//!
//! - Absent values are empty cells.
//! - `LaunchDate` uses [`LAUNCH_DATE_FORMAT`].
//! - Floats use the shortest representation that parses back to the same `f64`, so a
//!   written table reloads bit-for-bit with [`EnrichedTable::read_csv`].
//! - `MissionSuccess` and `IsExtremeWeather` are `0`/`1`.
//!
//! The file is replaced atomically: readers never observe a partially written table.

use std::str::FromStr;

use camino::Utf8Path;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    constants::*,
    features::{DerivedFeatures, LaunchEra, Season},
    launchwx_errors::LaunchWxError,
    persist::write_atomically,
    records::{CleanedRecord, ColumnLayout},
    weather::{WeatherObservation, WeatherProvenance},
};

/// Columns that follow `Payload` (and an appended `LaunchPriceM`), in output order.
const DERIVED_COLUMNS: [&str; 14] = [
    COL_LAUNCH_DATE,
    COL_MISSION_SUCCESS,
    COL_MISSION_SUCCESS_PROB,
    COL_TEMPERATURE,
    COL_WINDSPEED,
    COL_PRECIPITATION,
    COL_HUMIDITY,
    COL_WEATHER_SOURCE,
    COL_LAUNCH_YEAR,
    COL_LAUNCH_DECADE,
    COL_SEASON,
    COL_LAUNCH_ERA,
    COL_WEATHER_QUALITY,
    COL_EXTREME_WEATHER,
];

/// A cleaned launch with its weather and derived features.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedLaunchRecord {
    pub cleaned: CleanedRecord,
    pub weather: WeatherObservation,
    pub features: DerivedFeatures,
}

/// Feature dictionary consumed by the prediction component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFeatures {
    pub temperature_c: Option<f64>,
    pub windspeed_kmh: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub humidity_percent: Option<f64>,
    #[serde(rename = "LaunchYear")]
    pub launch_year: Option<i32>,
    #[serde(rename = "LaunchDecade")]
    pub launch_decade: Option<i32>,
    #[serde(rename = "WeatherQualityScore")]
    pub weather_quality_score: f64,
    #[serde(rename = "IsExtremeWeather")]
    pub is_extreme_weather: u8,
    #[serde(rename = "LaunchPriceM")]
    pub launch_price_m: Option<f64>,
}

impl EnrichedLaunchRecord {
    pub fn model_features(&self) -> ModelFeatures {
        ModelFeatures {
            temperature_c: self.weather.temperature_c,
            windspeed_kmh: self.weather.windspeed_kmh,
            precipitation_mm: self.weather.precipitation_mm,
            humidity_percent: self.weather.humidity_percent,
            launch_year: self.features.launch_year,
            launch_decade: self.features.launch_decade,
            weather_quality_score: self.features.weather_quality_score,
            is_extreme_weather: u8::from(self.features.is_extreme_weather),
            launch_price_m: self.cleaned.launch_price_m,
        }
    }

    /// Output cells, aligned with [`EnrichedTable::headers`].
    fn to_row(&self, layout: &ColumnLayout) -> Vec<String> {
        let c = &self.cleaned;
        let w = &self.weather;
        let f = &self.features;
        let price = fmt_opt(c.launch_price_m);

        let mut row = Vec::with_capacity(layout.passthrough.len() + 18);
        for (i, cell) in c.record.cells.iter().enumerate() {
            if layout.price_position == Some(i) {
                row.push(price.clone());
            }
            row.push(cell.clone());
        }
        if layout.price_position == Some(layout.passthrough.len()) {
            row.push(price.clone());
        }

        row.push(c.rocket_model.clone().unwrap_or_default());
        row.push(c.payload.clone().unwrap_or_default());
        if layout.price_position.is_none() {
            row.push(price);
        }
        row.push(
            c.launch_date
                .map(|d| d.format(LAUNCH_DATE_FORMAT).to_string())
                .unwrap_or_default(),
        );
        row.push(fmt_opt(c.mission_success));
        row.push(fmt_opt(c.mission_success_prob));
        row.push(fmt_opt(w.temperature_c));
        row.push(fmt_opt(w.windspeed_kmh));
        row.push(fmt_opt(w.precipitation_mm));
        row.push(fmt_opt(w.humidity_percent));
        row.push(w.source.to_string());
        row.push(fmt_opt(f.launch_year));
        row.push(fmt_opt(f.launch_decade));
        row.push(f.season.to_string());
        row.push(f.launch_era.to_string());
        row.push(f.weather_quality_score.to_string());
        row.push(u8::from(f.is_extreme_weather).to_string());
        row
    }
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// The enriched dataset, in input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    pub layout: ColumnLayout,
    pub records: Vec<EnrichedLaunchRecord>,
}

impl EnrichedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output header row.
    pub fn headers(&self) -> Vec<String> {
        let layout = &self.layout;
        let mut headers = Vec::with_capacity(layout.passthrough.len() + 18);
        for (i, name) in layout.passthrough.iter().enumerate() {
            if layout.price_position == Some(i) {
                headers.push(COL_LAUNCH_PRICE.to_string());
            }
            headers.push(name.clone());
        }
        if layout.price_position == Some(layout.passthrough.len()) {
            headers.push(COL_LAUNCH_PRICE.to_string());
        }
        headers.push(COL_ROCKET_MODEL.to_string());
        headers.push(COL_PAYLOAD.to_string());
        if layout.price_position.is_none() {
            headers.push(COL_LAUNCH_PRICE.to_string());
        }
        headers.extend(DERIVED_COLUMNS.iter().map(|s| s.to_string()));
        headers
    }

    pub fn column_count(&self) -> usize {
        self.headers().len()
    }

    /// Share of launches with `MissionSuccess == 1` among those with a known outcome.
    pub fn success_rate(&self) -> Option<f64> {
        let known: Vec<u8> = self
            .records
            .iter()
            .filter_map(|r| r.cleaned.mission_success)
            .collect();
        if known.is_empty() {
            return None;
        }
        let successes = known.iter().filter(|&&s| s == 1).count();
        Some(successes as f64 / known.len() as f64)
    }

    /// Write the table as CSV, replacing `path` atomically.
    pub fn write_csv(&self, path: &Utf8Path) -> Result<(), LaunchWxError> {
        write_atomically(path, |out| {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(self.headers())?;
            for record in &self.records {
                writer.write_record(record.to_row(&self.layout))?;
            }
            writer.flush()?;
            Ok(())
        })
    }

    /// Reload a table written by [`write_csv`](EnrichedTable::write_csv).
    ///
    /// Return
    /// ----------
    /// * The typed table, or a [`LaunchWxError`] if a derived column is missing or a derived
    ///   cell does not parse.
    pub fn read_csv(path: &Utf8Path) -> Result<Self, LaunchWxError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let find = |name: &str| -> Result<usize, LaunchWxError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LaunchWxError::MissingColumn(name.to_string()))
        };

        let model_idx = find(COL_ROCKET_MODEL)?;
        let payload_idx = find(COL_PAYLOAD)?;
        let price_idx = find(COL_LAUNCH_PRICE)?;
        let price_appended = price_idx == payload_idx + 1;
        let derived: Vec<usize> = DERIVED_COLUMNS
            .iter()
            .map(|name| find(name))
            .collect::<Result<_, _>>()?;
        let [date, success, prob, temp, wind, precip, humid, source, year, decade, season, era, score, extreme]: [usize; 14] =
            std::array::from_fn(|k| derived[k]);

        // Everything that is neither derived nor an appended price is an input column.
        let is_input = |idx: usize| {
            idx != model_idx
                && idx != payload_idx
                && !derived.contains(&idx)
                && !(price_appended && idx == price_idx)
        };
        let input_idx: Vec<usize> = (0..headers.len()).filter(|&i| is_input(i)).collect();
        let input_headers: Vec<String> = input_idx.iter().map(|&i| headers[i].clone()).collect();
        let layout = ColumnLayout::from_headers(&input_headers);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
            let text = |idx: usize| Some(cell(idx)).filter(|s| !s.is_empty()).map(String::from);

            let input_row: Vec<String> = input_idx
                .iter()
                .map(|&i| row.get(i).unwrap_or("").to_string())
                .collect();

            let cleaned = CleanedRecord {
                record: layout.record(&input_row),
                rocket_model: text(model_idx),
                payload: text(payload_idx),
                launch_price_m: parse_cell(COL_LAUNCH_PRICE, cell(price_idx))?,
                launch_date: parse_date_cell(cell(date))?,
                mission_success: parse_cell(COL_MISSION_SUCCESS, cell(success))?,
                mission_success_prob: parse_cell(COL_MISSION_SUCCESS_PROB, cell(prob))?,
            };

            let weather = WeatherObservation {
                temperature_c: parse_cell(COL_TEMPERATURE, cell(temp))?,
                windspeed_kmh: parse_cell(COL_WINDSPEED, cell(wind))?,
                precipitation_mm: parse_cell(COL_PRECIPITATION, cell(precip))?,
                humidity_percent: parse_cell(COL_HUMIDITY, cell(humid))?,
                source: cell(source).parse::<WeatherProvenance>()?,
            };

            let features = DerivedFeatures {
                launch_year: parse_cell(COL_LAUNCH_YEAR, cell(year))?,
                launch_decade: parse_cell(COL_LAUNCH_DECADE, cell(decade))?,
                season: cell(season).parse::<Season>()?,
                launch_era: cell(era).parse::<LaunchEra>()?,
                weather_quality_score: parse_cell(COL_WEATHER_QUALITY, cell(score))?
                    .ok_or_else(|| invalid(COL_WEATHER_QUALITY, ""))?,
                is_extreme_weather: parse_flag(cell(extreme))?,
            };

            records.push(EnrichedLaunchRecord {
                cleaned,
                weather,
                features,
            });
        }

        Ok(EnrichedTable { layout, records })
    }
}

fn invalid(column: &str, value: &str) -> LaunchWxError {
    LaunchWxError::InvalidCell {
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_cell<T: FromStr>(column: &str, value: &str) -> Result<Option<T>, LaunchWxError> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| invalid(column, value))
}

fn parse_date_cell(value: &str) -> Result<Option<NaiveDateTime>, LaunchWxError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, LAUNCH_DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid(COL_LAUNCH_DATE, value))
}

fn parse_flag(value: &str) -> Result<bool, LaunchWxError> {
    match value {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        _ => Err(invalid(COL_EXTREME_WEATHER, value)),
    }
}
