//! # Weather observation cache
//!
//! Observations are keyed by `(date, rounded latitude, rounded longitude)`, coordinates being
//! rounded to [`CACHE_COORD_DECIMALS`] places, so launches from the same pad on the same day
//! share one lookup. Each entry also belongs to a provider scope
//! ([`WeatherProvider::cache_scope`](super::WeatherProvider::cache_scope), e.g. `synthetic:42`
//! or `open-meteo:<endpoint>`): a lookup only sees the entries of its own scope, while every
//! scope is kept when the file is rewritten.
//!
//! The cache lives in memory and can optionally be backed by a CSV file. The file is read
//! once when the cache is opened and rewritten atomically by [`WeatherCache::save`]. The
//! default file sits in the user cache directory:
//!
//! ```text
//! <cache_dir>/launchwx_cache/weather_cache.csv
//! ```
//!
//! Only `precise` observations are stored. A failed lookup is retried on the next run.

use std::{collections::HashMap, fs};

use ahash::RandomState;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use csv::WriterBuilder;
use directories::BaseDirs;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    constants::CACHE_COORD_DECIMALS, launchwx_errors::LaunchWxError, persist::write_atomically,
    sites::Coordinates,
};

use super::WeatherObservation;

pub(crate) type FastHashMap<K, V> = HashMap<K, V, RandomState>;

fn round_coord(x: f64) -> OrderedFloat<f64> {
    let scale = 10f64.powi(CACHE_COORD_DECIMALS);
    OrderedFloat((x * scale).round() / scale)
}

/// Cache key: launch day and rounded site coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub date: NaiveDate,
    pub latitude: OrderedFloat<f64>,
    pub longitude: OrderedFloat<f64>,
}

impl CacheKey {
    pub fn new(date: NaiveDate, coordinates: Coordinates) -> Self {
        CacheKey {
            date,
            latitude: round_coord(coordinates.latitude),
            longitude: round_coord(coordinates.longitude),
        }
    }
}

/// One line of the cache file.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    provider: String,
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    temperature_c: Option<f64>,
    windspeed_kmh: Option<f64>,
    precipitation_mm: Option<f64>,
    humidity_percent: Option<f64>,
}

impl CacheRow {
    fn from_entry(scope: &str, key: &CacheKey, obs: &WeatherObservation) -> Self {
        CacheRow {
            provider: scope.to_string(),
            date: key.date,
            latitude: key.latitude.into_inner(),
            longitude: key.longitude.into_inner(),
            temperature_c: obs.temperature_c,
            windspeed_kmh: obs.windspeed_kmh,
            precipitation_mm: obs.precipitation_mm,
            humidity_percent: obs.humidity_percent,
        }
    }

    fn into_entry(self) -> (String, CacheKey, WeatherObservation) {
        let key = CacheKey::new(self.date, Coordinates::new(self.latitude, self.longitude));
        let obs = WeatherObservation::precise(
            self.temperature_c,
            self.windspeed_kmh,
            self.precipitation_mm,
            self.humidity_percent,
        );
        (self.provider, key, obs)
    }
}

type ScopedEntries = FastHashMap<String, FastHashMap<CacheKey, WeatherObservation>>;

#[derive(Debug, Default)]
pub struct WeatherCache {
    entries: ScopedEntries,
    path: Option<Utf8PathBuf>,
    dirty: bool,
}

impl WeatherCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        WeatherCache::default()
    }

    /// Open a file-backed cache, loading `path` if it exists.
    ///
    /// A missing file yields an empty cache. An unreadable or malformed file is logged and
    /// ignored: the run proceeds with an empty cache and overwrites the file on save.
    pub fn open(path: &Utf8Path) -> Self {
        let mut cache = WeatherCache {
            path: Some(path.to_path_buf()),
            ..WeatherCache::default()
        };

        if path.exists() {
            match read_cache_file(path) {
                Ok(entries) => {
                    cache.entries = entries;
                    info!("Loaded {} cached weather observations from {path}", cache.len());
                }
                Err(err) => warn!("Ignoring unreadable weather cache {path}: {err}"),
            }
        }
        cache
    }

    /// Default cache file location inside the user cache directory.
    ///
    /// Return
    /// ----------
    /// * The path `<cache_dir>/launchwx_cache/weather_cache.csv`; the directory is created.
    pub fn default_path() -> Result<Utf8PathBuf, LaunchWxError> {
        let base_dir = BaseDirs::new().ok_or_else(|| {
            LaunchWxError::UnableToCreateBaseDir("no home directory found".to_string())
        })?;
        let cache_dir = Utf8Path::from_path(base_dir.cache_dir())
            .ok_or_else(|| {
                LaunchWxError::Utf8PathError(base_dir.cache_dir().display().to_string())
            })?
            .join("launchwx_cache");
        fs::create_dir_all(&cache_dir)
            .map_err(|e| LaunchWxError::UnableToCreateBaseDir(format!("{cache_dir}: {e}")))?;
        Ok(cache_dir.join("weather_cache.csv"))
    }

    pub fn get(&self, scope: &str, key: &CacheKey) -> Option<&WeatherObservation> {
        self.entries.get(scope)?.get(key)
    }

    /// Store a `precise` observation under `scope`. `missing` observations are ignored.
    pub fn insert(&mut self, scope: &str, key: CacheKey, observation: WeatherObservation) {
        if observation.is_missing() {
            return;
        }
        self.entries
            .entry(scope.to_string())
            .or_default()
            .insert(key, observation);
        self.dirty = true;
    }

    /// Number of entries over all scopes.
    pub fn len(&self) -> usize {
        self.entries.values().map(|scoped| scoped.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Persist new entries to the backing file, if any.
    ///
    /// Rows are written sorted by scope then key so identical caches produce identical files.
    pub fn save(&mut self) -> Result<(), LaunchWxError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        write_atomically(path, |out| {
            let mut writer = WriterBuilder::new().from_writer(out);
            for (scope, scoped) in self.entries.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
                for (key, obs) in scoped.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
                    writer.serialize(CacheRow::from_entry(scope, key, obs))?;
                }
            }
            writer.flush()?;
            Ok(())
        })?;

        info!("Saved {} weather observations to {path}", self.len());
        self.dirty = false;
        Ok(())
    }
}

fn read_cache_file(path: &Utf8Path) -> Result<ScopedEntries, LaunchWxError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = ScopedEntries::default();
    for row in reader.deserialize::<CacheRow>() {
        let (scope, key, obs) = row?.into_entry();
        entries.entry(scope).or_default().insert(key, obs);
    }
    Ok(entries)
}
