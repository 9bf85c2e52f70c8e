//! Synthetic weather generator.
//!
//! Stand-in for a real provider in tests and offline runs. Values are drawn from:
//!
//! | field | distribution |
//! |-------|--------------|
//! | temperature | N(20, 5) °C |
//! | wind speed | N(15, 10) km/h, clamped at 0 |
//! | precipitation | Exp(mean 2) mm |
//! | humidity | N(60, 20) %, clamped to [0, 100] |
//!
//! Each lookup uses its own RNG seeded from the global seed, the day and the rounded
//! coordinates, so the same `(seed, date, site)` always yields the same observation,
//! whatever the lookup order.

use chrono::{Datelike, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Exp, Normal};

use crate::{launchwx_errors::LaunchWxError, sites::Coordinates};

use super::{cache::CacheKey, WeatherObservation, WeatherProvider};

const TEMPERATURE_MEAN: f64 = 20.0;
const TEMPERATURE_STD: f64 = 5.0;
const WIND_MEAN: f64 = 15.0;
const WIND_STD: f64 = 10.0;
const PRECIP_MEAN: f64 = 2.0;
const HUMIDITY_MEAN: f64 = 60.0;
const HUMIDITY_STD: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    temperature: Normal<f64>,
    wind: Normal<f64>,
    precipitation: Exp<f64>,
    humidity: Normal<f64>,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Result<Self, LaunchWxError> {
        Ok(SyntheticProvider {
            seed,
            temperature: Normal::new(TEMPERATURE_MEAN, TEMPERATURE_STD)?,
            wind: Normal::new(WIND_MEAN, WIND_STD)?,
            precipitation: Exp::new(1.0 / PRECIP_MEAN)?,
            humidity: Normal::new(HUMIDITY_MEAN, HUMIDITY_STD)?,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng_for(&self, date: NaiveDate, coordinates: Coordinates) -> StdRng {
        let key = CacheKey::new(date, coordinates);
        let mut state = splitmix64(self.seed);
        for word in [
            date.num_days_from_ce() as u64,
            key.latitude.into_inner().to_bits(),
            key.longitude.into_inner().to_bits(),
        ] {
            state = splitmix64(state ^ word);
        }
        StdRng::seed_from_u64(state)
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl WeatherProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn cache_scope(&self) -> String {
        format!("synthetic:{}", self.seed)
    }

    fn fetch(
        &self,
        date: NaiveDate,
        coordinates: Coordinates,
    ) -> Result<WeatherObservation, LaunchWxError> {
        let mut rng = self.rng_for(date, coordinates);
        let temperature = rng.sample(self.temperature);
        let wind = rng.sample(self.wind).max(0.0);
        let precipitation = rng.sample(self.precipitation);
        let humidity = rng.sample(self.humidity).clamp(0.0, 100.0);

        Ok(WeatherObservation::precise(
            Some(temperature),
            Some(wind),
            Some(precipitation),
            Some(humidity),
        ))
    }
}

#[cfg(test)]
mod synthetic_tests {
    use super::*;

    fn cape() -> Coordinates {
        Coordinates::new(28.3922, -80.6077)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_key_same_observation() {
        let a = SyntheticProvider::new(42).unwrap();
        let b = SyntheticProvider::new(42).unwrap();
        let first = a.fetch(day(1990, 4, 24), cape()).unwrap();
        // interleave another lookup, order must not matter
        a.fetch(day(2001, 1, 1), cape()).unwrap();
        assert_eq!(first, a.fetch(day(1990, 4, 24), cape()).unwrap());
        assert_eq!(first, b.fetch(day(1990, 4, 24), cape()).unwrap());
    }

    #[test]
    fn test_seed_changes_values() {
        let a = SyntheticProvider::new(1).unwrap();
        let b = SyntheticProvider::new(2).unwrap();
        assert_ne!(
            a.fetch(day(1990, 4, 24), cape()).unwrap(),
            b.fetch(day(1990, 4, 24), cape()).unwrap()
        );
    }

    #[test]
    fn test_cache_scope_carries_seed() {
        let provider = SyntheticProvider::new(5).unwrap();
        assert_eq!(provider.seed(), 5);
        assert_eq!(provider.cache_scope(), "synthetic:5");
        assert_ne!(
            provider.cache_scope(),
            SyntheticProvider::new(0).unwrap().cache_scope()
        );
    }

    #[test]
    fn test_values_are_physical() {
        let provider = SyntheticProvider::new(7).unwrap();
        for offset in 0..500 {
            let date = day(1957, 10, 4) + chrono::Days::new(offset * 37);
            let obs = provider.fetch(date, cape()).unwrap();
            assert!(obs.windspeed_kmh.unwrap() >= 0.0);
            assert!(obs.precipitation_mm.unwrap() >= 0.0);
            let h = obs.humidity_percent.unwrap();
            assert!((0.0..=100.0).contains(&h));
            assert!(obs.temperature_c.unwrap().is_finite());
            assert!(!obs.is_missing());
        }
    }
}
