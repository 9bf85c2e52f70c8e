//! # Launch-site registry
//!
//! Maps the free-text `Location` of a launch record to the geographic
//! [`Coordinates`] of a known launch site.
//!
//! ## Resolution rule
//!
//! The registry is an **ordered** list of `(name, coordinates)` pairs. A location resolves
//! to the **first** registered site whose name appears, case-insensitively, as a substring
//! of the location text. When several names match the same location (e.g. a location
//! mentioning both "Cape Canaveral" and "Kennedy Space Center"), registration order decides.
//!
//! There is no fuzzy matching and no geocoding fallback: an unknown or empty location
//! is simply *unresolved* (`None`).
//!
//! ```rust
//! use launchwx::sites::SiteRegistry;
//!
//! let registry = SiteRegistry::default();
//! let coords = registry
//!     .resolve(Some("LC-39A, Kennedy Space Center, Florida, USA"))
//!     .unwrap();
//! assert_eq!(coords.latitude, 28.5729);
//! assert!(registry.resolve(Some("Somewhere, Atlantis")).is_none());
//! ```
//!
//! ## See also
//! ------------
//! * [`KNOWN_LAUNCH_SITES`](crate::constants::KNOWN_LAUNCH_SITES) – The built-in site table.
//! * [`WeatherService::observe`](crate::weather::WeatherService::observe) – Consumer of the resolved coordinates.

use std::fmt;

use crate::constants::{Degree, KNOWN_LAUNCH_SITES};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: Degree,
    pub longitude: Degree,
}

impl Coordinates {
    pub fn new(latitude: Degree, longitude: Degree) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// A named launch site.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSite {
    pub name: String,
    pub coordinates: Coordinates,

    /// Lowercased name, precomputed for matching.
    needle: String,
}

impl LaunchSite {
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        let name = name.into();
        let needle = name.to_lowercase();
        LaunchSite {
            name,
            coordinates,
            needle,
        }
    }

    /// True when this site's name is contained in `location_lower`.
    fn matches(&self, location_lower: &str) -> bool {
        !self.needle.is_empty() && location_lower.contains(&self.needle)
    }
}

/// Ordered registry of launch sites, resolved with first-match-wins semantics.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<LaunchSite>,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        SiteRegistry::new(
            KNOWN_LAUNCH_SITES
                .iter()
                .map(|(name, lat, lon)| LaunchSite::new(*name, Coordinates::new(*lat, *lon)))
                .collect(),
        )
    }
}

impl SiteRegistry {
    /// Build a registry from an explicit list of sites, kept in the given order.
    pub fn new(sites: Vec<LaunchSite>) -> Self {
        SiteRegistry { sites }
    }

    /// Append a site at the end of the registry.
    ///
    /// Earlier entries keep precedence over this one when both match a location.
    pub fn register(&mut self, name: impl Into<String>, coordinates: Coordinates) {
        self.sites.push(LaunchSite::new(name, coordinates));
    }

    /// Find the first registered site whose name appears in `location`.
    ///
    /// Arguments
    /// -----------------
    /// * `location`: Free-text launch location, e.g. `"SLC-40, Cape Canaveral AFS, Florida, USA"`.
    ///
    /// Return
    /// ----------
    /// * The matching [`LaunchSite`], or `None` when no registered name is contained in the text.
    pub fn resolve_site(&self, location: &str) -> Option<&LaunchSite> {
        let location_lower = location.to_lowercase();
        self.sites.iter().find(|site| site.matches(&location_lower))
    }

    /// Resolve an optional location to coordinates.
    ///
    /// A missing or blank location is unresolved, never an error.
    pub fn resolve(&self, location: Option<&str>) -> Option<Coordinates> {
        let location = location.map(str::trim).filter(|l| !l.is_empty())?;
        self.resolve_site(location).map(|site| site.coordinates)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LaunchSite> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
