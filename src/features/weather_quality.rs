//! Weather quality score and extreme-weather flag.
//!
//! The score starts at `1.0` and is multiplied by one wind factor and one precipitation
//! factor. An absent field contributes a factor of `1.0`.
//!
//! | wind (km/h) | factor | | precipitation (mm) | factor |
//! |-------------|--------|-|--------------------|--------|
//! | > 40 | 0.3 | | > 5 | 0.3 |
//! | > 30 | 0.6 | | > 2 | 0.7 |
//! | > 20 | 0.8 | | otherwise | 1.0 |
//! | otherwise | 1.0 | | | |
//!
//! The extreme-weather flag uses its own, coarser thresholds (wind > 50 km/h or
//! precipitation > 10 mm); a comparison against an absent field is never extreme.

use crate::constants::{
    KmPerHour, Millimeter, EXTREME_PRECIP_MM, EXTREME_WIND_KMH, PRECIP_HEAVY_FACTOR,
    PRECIP_HEAVY_MM, PRECIP_MODERATE_FACTOR, PRECIP_MODERATE_MM, WIND_MODERATE_FACTOR,
    WIND_MODERATE_KMH, WIND_SEVERE_FACTOR, WIND_SEVERE_KMH, WIND_STRONG_FACTOR, WIND_STRONG_KMH,
};

pub fn wind_penalty(windspeed_kmh: KmPerHour) -> f64 {
    if windspeed_kmh > WIND_SEVERE_KMH {
        WIND_SEVERE_FACTOR
    } else if windspeed_kmh > WIND_STRONG_KMH {
        WIND_STRONG_FACTOR
    } else if windspeed_kmh > WIND_MODERATE_KMH {
        WIND_MODERATE_FACTOR
    } else {
        1.0
    }
}

pub fn precipitation_penalty(precipitation_mm: Millimeter) -> f64 {
    if precipitation_mm > PRECIP_HEAVY_MM {
        PRECIP_HEAVY_FACTOR
    } else if precipitation_mm > PRECIP_MODERATE_MM {
        PRECIP_MODERATE_FACTOR
    } else {
        1.0
    }
}

/// Composite quality score in `(0, 1]`.
pub fn weather_quality_score(
    windspeed_kmh: Option<KmPerHour>,
    precipitation_mm: Option<Millimeter>,
) -> f64 {
    let mut score = 1.0;
    if let Some(wind) = windspeed_kmh {
        score *= wind_penalty(wind);
    }
    if let Some(precip) = precipitation_mm {
        score *= precipitation_penalty(precip);
    }
    score
}

pub fn is_extreme_weather(
    windspeed_kmh: Option<KmPerHour>,
    precipitation_mm: Option<Millimeter>,
) -> bool {
    windspeed_kmh.is_some_and(|w| w > EXTREME_WIND_KMH)
        || precipitation_mm.is_some_and(|p| p > EXTREME_PRECIP_MM)
}

#[cfg(test)]
mod weather_quality_tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_wind_buckets() {
        assert_eq!(wind_penalty(0.0), 1.0);
        assert_eq!(wind_penalty(20.0), 1.0);
        assert_eq!(wind_penalty(20.01), 0.8);
        assert_eq!(wind_penalty(30.0), 0.8);
        assert_eq!(wind_penalty(30.5), 0.6);
        assert_eq!(wind_penalty(40.0), 0.6);
        assert_eq!(wind_penalty(40.1), 0.3);
        assert_eq!(wind_penalty(120.0), 0.3);
    }

    #[test]
    fn test_precipitation_buckets() {
        assert_eq!(precipitation_penalty(0.0), 1.0);
        assert_eq!(precipitation_penalty(2.0), 1.0);
        assert_eq!(precipitation_penalty(2.5), 0.7);
        assert_eq!(precipitation_penalty(5.0), 0.7);
        assert_eq!(precipitation_penalty(5.1), 0.3);
    }

    #[test]
    fn test_penalties_are_monotonic() {
        let mut last = f64::INFINITY;
        for step in 0..=1000 {
            let w = step as f64 * 0.1;
            let f = wind_penalty(w);
            assert!(f <= last && f > 0.0 && f <= 1.0, "wind {w}");
            last = f;
        }
        let mut last = f64::INFINITY;
        for step in 0..=300 {
            let p = step as f64 * 0.05;
            let f = precipitation_penalty(p);
            assert!(f <= last && f > 0.0 && f <= 1.0, "precip {p}");
            last = f;
        }
    }

    #[test]
    fn test_score_combination() {
        assert_relative_eq!(weather_quality_score(Some(35.0), Some(3.0)), 0.42, epsilon = 1e-12);
        assert_relative_eq!(weather_quality_score(Some(45.0), Some(6.0)), 0.09, epsilon = 1e-12);
        assert_eq!(weather_quality_score(Some(25.0), None), 0.8);
        assert_eq!(weather_quality_score(None, Some(2.5)), 0.7);
        assert_eq!(weather_quality_score(None, None), 1.0);
        assert_eq!(weather_quality_score(Some(10.0), Some(0.0)), 1.0);
    }

    #[test]
    fn test_extreme_weather() {
        assert!(!is_extreme_weather(Some(35.0), Some(3.0)));
        assert!(is_extreme_weather(Some(60.0), Some(0.0)));
        assert!(is_extreme_weather(Some(0.0), Some(10.5)));
        assert!(!is_extreme_weather(Some(50.0), Some(10.0)));
        assert!(is_extreme_weather(None, Some(11.0)));
        assert!(is_extreme_weather(Some(51.0), None));
        assert!(!is_extreme_weather(None, Some(1.0)));
        assert!(!is_extreme_weather(Some(1.0), None));
        assert!(!is_extreme_weather(None, None));
    }
}
