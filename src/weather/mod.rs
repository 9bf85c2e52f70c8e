//! # Historical weather observations
//!
//! This module attaches a [`WeatherObservation`] to each launch. It gathers:
//!
//! - The observation type itself, with a [`WeatherProvenance`] tag telling whether the values
//!   came from a lookup (`precise`) or are unavailable (`missing`).
//! - The [`WeatherProvider`] capability: `(date, coordinates) → WeatherObservation`.
//!   Two implementations ship with the crate:
//!   [`OpenMeteoProvider`](crate::weather::open_meteo::OpenMeteoProvider) (real historical archive)
//!   and [`SyntheticProvider`](crate::weather::synthetic::SyntheticProvider) (seeded generator
//!   for tests and offline use).
//! - [`ProviderSpec`], the configuration string selecting a provider
//!   (`"open-meteo"`, `"open-meteo:<url>"`, `"synthetic"`, `"synthetic:<seed>"`, `"offline"`).
//! - [`WeatherService`], which wraps a provider with the [`WeatherCache`](crate::weather::cache::WeatherCache)
//!   and enforces the input/failure policy. Cached entries are looked up under the provider's
//!   [`cache_scope`](WeatherProvider::cache_scope), so a cache file shared by several
//!   providers never serves one provider's values to another:
//!
//! ```text
//! date absent or site unresolved ──► missing (provider never queried)
//! cache hit                      ──► cached precise observation
//! provider Ok                    ──► precise observation, cached
//! provider Err                   ──► missing (logged, batch continues)
//! ```
//!
//! ## See also
//! ------------
//! * [`Coordinates`] – Output of the site registry, input of every lookup.
//! * [`derive_features`](crate::features::derive_features) – Consumer of the observation fields.

pub mod cache;
pub mod open_meteo;
pub mod synthetic;

use std::{fmt, str::FromStr, time::Duration};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    constants::{Celsius, KmPerHour, Millimeter, Percent},
    launchwx_errors::LaunchWxError,
    sites::Coordinates,
};

use cache::{CacheKey, WeatherCache};
use open_meteo::OpenMeteoProvider;
use synthetic::SyntheticProvider;

/// Where the values of a [`WeatherObservation`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherProvenance {
    Precise,
    Missing,
}

impl fmt::Display for WeatherProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherProvenance::Precise => write!(f, "precise"),
            WeatherProvenance::Missing => write!(f, "missing"),
        }
    }
}

impl FromStr for WeatherProvenance {
    type Err = LaunchWxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "precise" => Ok(WeatherProvenance::Precise),
            "missing" => Ok(WeatherProvenance::Missing),
            _ => Err(LaunchWxError::InvalidCell {
                column: crate::constants::COL_WEATHER_SOURCE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Weather at a launch site on a launch day.
///
/// Every numeric field may be absent independently of the others.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub temperature_c: Option<Celsius>,
    pub windspeed_kmh: Option<KmPerHour>,
    pub precipitation_mm: Option<Millimeter>,
    pub humidity_percent: Option<Percent>,
    pub source: WeatherProvenance,
}

impl WeatherObservation {
    /// The observation used when no lookup is possible or the lookup failed.
    pub fn missing() -> Self {
        WeatherObservation {
            temperature_c: None,
            windspeed_kmh: None,
            precipitation_mm: None,
            humidity_percent: None,
            source: WeatherProvenance::Missing,
        }
    }

    /// Build a `precise` observation. Non-finite values are stored as absent.
    pub fn precise(
        temperature_c: Option<Celsius>,
        windspeed_kmh: Option<KmPerHour>,
        precipitation_mm: Option<Millimeter>,
        humidity_percent: Option<Percent>,
    ) -> Self {
        WeatherObservation {
            temperature_c: finite(temperature_c),
            windspeed_kmh: finite(windspeed_kmh),
            precipitation_mm: finite(precipitation_mm),
            humidity_percent: finite(humidity_percent),
            source: WeatherProvenance::Precise,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.source == WeatherProvenance::Missing
    }
}

fn finite(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite())
}

/// A source of historical weather observations.
///
/// Implementations only see valid inputs: the [`WeatherService`] never calls
/// [`fetch`](WeatherProvider::fetch) without a date and resolved coordinates.
pub trait WeatherProvider: Send + Sync {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Identity under which this provider's observations are cached.
    ///
    /// Two providers sharing a scope must return the same observation for the same lookup,
    /// so the scope includes every setting that changes the values (seed, endpoint).
    fn cache_scope(&self) -> String {
        self.name().to_string()
    }

    /// Retrieve the observation for `date` at `coordinates`.
    ///
    /// Errors are recoverable per record: the caller degrades them to a `missing` observation.
    fn fetch(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<WeatherObservation, LaunchWxError>;
}

/// Configuration-level selection of a weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSpec {
    /// Open-Meteo historical archive, optionally at a custom endpoint.
    OpenMeteo { endpoint: Option<String> },
    /// Seeded synthetic generator.
    Synthetic { seed: u64 },
    /// No provider: every observation is `missing`.
    Offline,
}

impl Default for ProviderSpec {
    fn default() -> Self {
        ProviderSpec::Synthetic { seed: 0 }
    }
}

impl FromStr for ProviderSpec {
    type Err = LaunchWxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg.trim())),
            None => (s, None),
        };

        match (kind.to_lowercase().as_str(), arg) {
            ("offline", None) => Ok(ProviderSpec::Offline),
            ("synthetic", None) => Ok(ProviderSpec::Synthetic { seed: 0 }),
            ("synthetic", Some(seed)) => seed
                .parse()
                .map(|seed| ProviderSpec::Synthetic { seed })
                .map_err(|_| {
                    LaunchWxError::InvalidProviderSpec(format!("invalid synthetic seed: {seed}"))
                }),
            ("open-meteo", None) => Ok(ProviderSpec::OpenMeteo { endpoint: None }),
            ("open-meteo", Some(url)) if !url.is_empty() => Ok(ProviderSpec::OpenMeteo {
                endpoint: Some(url.to_string()),
            }),
            _ => Err(LaunchWxError::InvalidProviderSpec(s.to_string())),
        }
    }
}

impl fmt::Display for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSpec::OpenMeteo { endpoint: None } => write!(f, "open-meteo"),
            ProviderSpec::OpenMeteo {
                endpoint: Some(url),
            } => write!(f, "open-meteo:{url}"),
            ProviderSpec::Synthetic { seed } => write!(f, "synthetic:{seed}"),
            ProviderSpec::Offline => write!(f, "offline"),
        }
    }
}

impl ProviderSpec {
    /// Instantiate the provider described by this `ProviderSpec`.
    ///
    /// Arguments
    /// -----------------
    /// * `request_delay`: Pause before each remote request (real provider only).
    /// * `max_retries`: Extra attempts after a failed remote request (real provider only).
    ///
    /// Return
    /// ----------
    /// * `Ok(None)` for [`ProviderSpec::Offline`], the boxed provider otherwise.
    pub fn build(
        &self,
        request_delay: Duration,
        max_retries: u32,
    ) -> Result<Option<Box<dyn WeatherProvider>>, LaunchWxError> {
        match self {
            ProviderSpec::Offline => Ok(None),
            ProviderSpec::Synthetic { seed } => Ok(Some(Box::new(SyntheticProvider::new(*seed)?))),
            ProviderSpec::OpenMeteo { endpoint } => {
                let mut provider = match endpoint {
                    Some(url) => OpenMeteoProvider::with_endpoint(url)?,
                    None => OpenMeteoProvider::new(),
                };
                provider.set_request_delay(request_delay);
                provider.set_max_retries(max_retries);
                Ok(Some(Box::new(provider)))
            }
        }
    }
}

/// Lookup counters collected by a [`WeatherService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherStats {
    /// Observations returned with `precise` provenance.
    pub precise: usize,
    /// Observations returned with `missing` provenance.
    pub missing: usize,
    /// Lookups answered from the cache.
    pub cache_hits: usize,
    /// Calls made to the provider.
    pub fetches: usize,
    /// Provider calls that failed and were degraded to `missing`.
    pub failures: usize,
}

/// A weather provider combined with its cache and the per-record fallback policy.
pub struct WeatherService {
    provider: Option<Box<dyn WeatherProvider>>,
    cache: WeatherCache,
    stats: WeatherStats,
}

impl WeatherService {
    pub fn new(provider: Option<Box<dyn WeatherProvider>>, cache: WeatherCache) -> Self {
        WeatherService {
            provider,
            cache,
            stats: WeatherStats::default(),
        }
    }

    /// Observation for one launch.
    ///
    /// Arguments
    /// -----------------
    /// * `date`: Launch day, if the record's date could be parsed.
    /// * `coordinates`: Launch-site coordinates, if the location could be resolved.
    ///
    /// Return
    /// ----------
    /// * A `precise` observation from the cache or the provider, or
    ///   [`WeatherObservation::missing`] when an input is absent, no provider is configured,
    ///   or the provider failed. This never fails.
    pub fn observe(
        &mut self,
        date: Option<NaiveDate>,
        coordinates: Option<Coordinates>,
    ) -> WeatherObservation {
        let (Some(date), Some(coordinates), Some(provider)) =
            (date, coordinates, self.provider.as_deref())
        else {
            self.stats.missing += 1;
            return WeatherObservation::missing();
        };

        let scope = provider.cache_scope();
        let key = CacheKey::new(date, coordinates);
        if let Some(observation) = self.cache.get(&scope, &key) {
            debug!("weather cache hit for {date} at {coordinates}");
            self.stats.cache_hits += 1;
            self.stats.precise += 1;
            return observation.clone();
        }

        self.stats.fetches += 1;
        match provider.fetch(date, coordinates) {
            Ok(observation) => {
                if observation.is_missing() {
                    self.stats.missing += 1;
                } else {
                    self.stats.precise += 1;
                    self.cache.insert(&scope, key, observation.clone());
                }
                observation
            }
            Err(err) => {
                warn!(
                    "{} lookup failed for {date} at {coordinates}: {err}",
                    provider.name()
                );
                self.stats.failures += 1;
                self.stats.missing += 1;
                WeatherObservation::missing()
            }
        }
    }

    pub fn stats(&self) -> WeatherStats {
        self.stats
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Persist the cache to its backing file, if it has one.
    pub fn save_cache(&mut self) -> Result<(), LaunchWxError> {
        self.cache.save()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_deref().map_or("offline", |p| p.name())
    }
}

#[cfg(test)]
mod weather_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl WeatherProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn fetch(
            &self,
            _date: NaiveDate,
            _coordinates: Coordinates,
        ) -> Result<WeatherObservation, LaunchWxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LaunchWxError::ProviderResponse("boom".into()))
            } else {
                Ok(WeatherObservation::precise(
                    Some(21.0),
                    Some(12.0),
                    Some(0.0),
                    Some(55.0),
                ))
            }
        }
    }

    fn service(fail: bool) -> (WeatherService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: calls.clone(),
            fail,
        };
        (
            WeatherService::new(Some(Box::new(provider)), WeatherCache::in_memory()),
            calls,
        )
    }

    fn cape() -> Coordinates {
        Coordinates::new(28.3922, -80.6077)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 8, 7).unwrap()
    }

    #[test]
    fn test_missing_inputs_never_query_provider() {
        let (mut service, calls) = service(false);
        assert!(service.observe(None, Some(cape())).is_missing());
        assert!(service.observe(Some(day()), None).is_missing());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.stats().missing, 2);
    }

    #[test]
    fn test_cache_prevents_refetch() {
        let (mut service, calls) = service(false);
        let first = service.observe(Some(day()), Some(cape()));
        let second = service.observe(Some(day()), Some(Coordinates::new(28.39220001, -80.6077)));
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.stats().cache_hits, 1);
        assert_eq!(service.stats().precise, 2);
    }

    #[test]
    fn test_provider_failure_degrades_to_missing() {
        let (mut service, calls) = service(true);
        let obs = service.observe(Some(day()), Some(cape()));
        assert_eq!(obs, WeatherObservation::missing());
        // failures are not cached
        service.observe(Some(day()), Some(cape()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.stats().failures, 2);
        assert!(service.cache().is_empty());
    }

    #[test]
    fn test_offline_service() {
        let mut service = WeatherService::new(None, WeatherCache::in_memory());
        assert!(service.observe(Some(day()), Some(cape())).is_missing());
        assert_eq!(service.provider_name(), "offline");
    }

    #[test]
    fn test_precise_drops_non_finite() {
        let obs = WeatherObservation::precise(Some(f64::NAN), Some(3.0), None, Some(f64::INFINITY));
        assert_eq!(obs.temperature_c, None);
        assert_eq!(obs.windspeed_kmh, Some(3.0));
        assert_eq!(obs.humidity_percent, None);
        assert_eq!(obs.source, WeatherProvenance::Precise);
    }

    #[test]
    fn test_provider_spec_parsing() {
        assert_eq!(
            "offline".parse::<ProviderSpec>().unwrap(),
            ProviderSpec::Offline
        );
        assert_eq!(
            "synthetic".parse::<ProviderSpec>().unwrap(),
            ProviderSpec::Synthetic { seed: 0 }
        );
        assert_eq!(
            "synthetic:42".parse::<ProviderSpec>().unwrap(),
            ProviderSpec::Synthetic { seed: 42 }
        );
        assert_eq!(
            "open-meteo".parse::<ProviderSpec>().unwrap(),
            ProviderSpec::OpenMeteo { endpoint: None }
        );
        assert_eq!(
            "open-meteo:http://localhost:8080/v1/archive"
                .parse::<ProviderSpec>()
                .unwrap(),
            ProviderSpec::OpenMeteo {
                endpoint: Some("http://localhost:8080/v1/archive".into())
            }
        );
        assert!("synthetic:abc".parse::<ProviderSpec>().is_err());
        assert_eq!(
            "meteo-france".parse::<ProviderSpec>(),
            Err(LaunchWxError::InvalidProviderSpec("meteo-france".into()))
        );
    }

    #[test]
    fn test_provider_spec_display_roundtrip() {
        for spec in [
            ProviderSpec::Offline,
            ProviderSpec::Synthetic { seed: 7 },
            ProviderSpec::OpenMeteo { endpoint: None },
        ] {
            assert_eq!(spec.to_string().parse::<ProviderSpec>().unwrap(), spec);
        }
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(WeatherProvenance::Precise.to_string(), "precise");
        assert_eq!(
            "missing".parse::<WeatherProvenance>().unwrap(),
            WeatherProvenance::Missing
        );
        assert!("synthetic".parse::<WeatherProvenance>().is_err());
    }
}
