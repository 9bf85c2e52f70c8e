#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use launchwx::{
    CacheConfig, Coordinates, LaunchWxError, PipelineConfig, ProviderSpec, WeatherObservation,
    WeatherProvider,
};

pub const SAMPLE_CSV: &str = "tests/data/launches_sample.csv";

/// Rows in the sample dataset.
pub const SAMPLE_ROWS: usize = 10;
/// Rows of the sample dataset whose location resolves and whose date parses.
pub const SAMPLE_RESOLVABLE: usize = 8;

pub fn utf8_dir(dir: &tempfile::TempDir) -> &Utf8Path {
    Utf8Path::from_path(dir.path()).expect("temp dir is UTF-8")
}

/// A configuration reading the sample dataset and writing into `dir`, without a cache.
pub fn sample_config(dir: &Utf8Path, provider: ProviderSpec) -> PipelineConfig {
    PipelineConfig {
        input: Utf8PathBuf::from(SAMPLE_CSV),
        output: dir.join("enriched.csv"),
        provider,
        cache: CacheConfig::Disabled,
        ..PipelineConfig::default()
    }
}

/// Returns the same observation for every lookup and counts calls.
pub struct FixedProvider {
    pub observation: WeatherObservation,
    pub calls: Arc<AtomicUsize>,
}

impl FixedProvider {
    pub fn new(windspeed_kmh: f64, precipitation_mm: f64) -> Self {
        FixedProvider {
            observation: WeatherObservation::precise(
                Some(21.5),
                Some(windspeed_kmh),
                Some(precipitation_mm),
                Some(55.0),
            ),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl WeatherProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(
        &self,
        _date: NaiveDate,
        _coordinates: Coordinates,
    ) -> Result<WeatherObservation, LaunchWxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.observation.clone())
    }
}

/// Fails every lookup, like an unreachable archive.
pub struct FailingProvider;

impl WeatherProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn fetch(
        &self,
        _date: NaiveDate,
        _coordinates: Coordinates,
    ) -> Result<WeatherObservation, LaunchWxError> {
        Err(LaunchWxError::ProviderResponse(
            "service unavailable".to_string(),
        ))
    }
}

pub fn column<'a>(headers: &[String], rows: &'a [Vec<String>], name: &str) -> Vec<&'a str> {
    let idx = headers
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("missing column {name}"));
    rows.iter().map(|r| r[idx].as_str()).collect()
}

/// Read a CSV file into its header and rows.
pub fn read_csv(path: &Utf8Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}
