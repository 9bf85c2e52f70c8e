//! # Open-Meteo historical archive provider
//!
//! Queries the [Open-Meteo archive API](https://open-meteo.com/en/docs/historical-weather-api)
//! for the daily aggregates of one day at one site:
//!
//! ```text
//! GET <endpoint>?latitude=28.5729&longitude=-80.649
//!               &start_date=2020-08-07&end_date=2020-08-07
//!               &daily=temperature_2m_mean,wind_speed_10m_max,precipitation_sum,relative_humidity_2m_mean
//!               &timezone=UTC
//! ```
//!
//! The first value of each daily series is used; a JSON `null` becomes an absent field.
//! A day for which the archive has no value at all is reported as an error, which the
//! [`WeatherService`](crate::weather::WeatherService) turns into a `missing` observation.
//!
//! Requests go through one shared [`ureq::Agent`] with a global timeout. An optional delay is
//! observed before every request. Transport errors, `429` and `5xx` answers are retried
//! `max_retries` times; any other non-`2xx` answer (the archive replies `400` with
//! `{"error": true, "reason": …}` to an out-of-range date) fails at once.

use std::{thread, time::Duration};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::{launchwx_errors::LaunchWxError, sites::Coordinates};

use super::{WeatherObservation, WeatherProvider};

pub const OPEN_METEO_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

const DAILY_VARIABLES: &str =
    "temperature_2m_mean,wind_speed_10m_max,precipitation_sum,relative_humidity_2m_mean";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    daily: Option<DailySeries>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<Option<f64>>,
}

fn first(series: &[Option<f64>]) -> Option<f64> {
    series.first().copied().flatten()
}

/// Decode an archive reply, status included.
///
/// Return
/// ----------
/// * The observation of a `2xx` reply (see [`parse_archive_response`]).
/// * [`LaunchWxError::ProviderUnavailable`] for `429` and `5xx`, worth retrying.
/// * [`LaunchWxError::ProviderResponse`] for any other status, carrying the archive's
///   `reason` when the body has one.
pub(crate) fn parse_archive_reply(
    status: u16,
    body: &str,
) -> Result<WeatherObservation, LaunchWxError> {
    match status {
        200..=299 => parse_archive_response(body),
        429 | 500..=599 => Err(LaunchWxError::ProviderUnavailable(format!("HTTP {status}"))),
        _ => match parse_archive_response(body) {
            Err(err @ LaunchWxError::ProviderResponse(_)) => Err(err),
            _ => Err(LaunchWxError::ProviderResponse(format!("HTTP {status}"))),
        },
    }
}

/// Decode an archive response body into an observation.
///
/// Arguments
/// -----------------
/// * `body`: Raw JSON returned by the archive endpoint.
///
/// Return
/// ----------
/// * A `precise` [`WeatherObservation`], or a [`LaunchWxError`] when the body is not valid JSON,
///   reports an API error, or carries no value for any of the four variables.
pub(crate) fn parse_archive_response(body: &str) -> Result<WeatherObservation, LaunchWxError> {
    let response: ArchiveResponse = serde_json::from_str(body)?;

    if response.error {
        return Err(LaunchWxError::ProviderResponse(
            response
                .reason
                .unwrap_or_else(|| "unspecified archive error".to_string()),
        ));
    }

    let daily = response
        .daily
        .ok_or_else(|| LaunchWxError::ProviderResponse("no daily block".to_string()))?;

    let observation = WeatherObservation::precise(
        first(&daily.temperature_2m_mean),
        first(&daily.wind_speed_10m_max),
        first(&daily.precipitation_sum),
        first(&daily.relative_humidity_2m_mean),
    );

    let has_any = observation.temperature_c.is_some()
        || observation.windspeed_kmh.is_some()
        || observation.precipitation_mm.is_some()
        || observation.humidity_percent.is_some();

    if has_any {
        Ok(observation)
    } else {
        Err(LaunchWxError::ProviderResponse(
            "archive has no value for this day".to_string(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http_client: Agent,
    endpoint: String,
    request_delay: Duration,
    max_retries: u32,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    /// Provider pointed at the public archive endpoint.
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();

        OpenMeteoProvider {
            http_client: agent,
            endpoint: OPEN_METEO_ARCHIVE_URL.to_string(),
            request_delay: Duration::ZERO,
            max_retries: 0,
        }
    }

    /// Provider pointed at a custom endpoint (mirror, proxy, local stub).
    pub fn with_endpoint(endpoint: &str) -> Result<Self, LaunchWxError> {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(LaunchWxError::InvalidUrl(endpoint.to_string()));
        }
        Ok(OpenMeteoProvider {
            endpoint: endpoint.to_string(),
            ..Self::new()
        })
    }

    pub fn set_request_delay(&mut self, delay: Duration) {
        self.request_delay = delay;
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<WeatherObservation, LaunchWxError> {
        let day = date.format("%Y-%m-%d").to_string();
        let mut response = self
            .http_client
            .get(self.endpoint.as_str())
            .query("latitude", coordinates.latitude.to_string())
            .query("longitude", coordinates.longitude.to_string())
            .query("start_date", &day)
            .query("end_date", &day)
            .query("daily", DAILY_VARIABLES)
            .query("timezone", "UTC")
            .call()?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        parse_archive_reply(status, &body)
    }
}

impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &str {
        "open-meteo"
    }

    fn cache_scope(&self) -> String {
        format!("open-meteo:{}", self.endpoint)
    }

    fn fetch(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<WeatherObservation, LaunchWxError> {
        let mut attempt = 0;
        loop {
            if !self.request_delay.is_zero() {
                thread::sleep(self.request_delay);
            }

            match self.request(date, coordinates) {
                Ok(observation) => return Ok(observation),
                // An answered request with no data will not improve on retry.
                Err(err @ LaunchWxError::ProviderResponse(_)) => return Err(err),
                Err(err) if attempt >= self.max_retries => return Err(err),
                Err(err) => {
                    attempt += 1;
                    debug!("open-meteo attempt {attempt} failed for {date}: {err}");
                }
            }
        }
    }
}
