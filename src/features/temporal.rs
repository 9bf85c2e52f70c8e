//! Calendar features: year, decade, season and spaceflight era.

use std::{fmt, str::FromStr};

use crate::{constants::COL_SEASON, launchwx_errors::LaunchWxError};

/// Meteorological season (northern-hemisphere month grouping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    Unknown,
}

impl Season {
    /// Season of a calendar month (1–12). Every month other than 3–11 is `Winter`.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = LaunchWxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Spring" => Ok(Season::Spring),
            "Summer" => Ok(Season::Summer),
            "Fall" => Ok(Season::Fall),
            "Winter" => Ok(Season::Winter),
            "Unknown" => Ok(Season::Unknown),
            _ => Err(LaunchWxError::InvalidCell {
                column: COL_SEASON.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Historical period of spaceflight.
///
/// Boundaries include their lower year: 1970 is already `ColdWarEra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchEra {
    EarlySpaceAge,
    ColdWarEra,
    PostColdWar,
    CommercialSpace,
    Unknown,
}

impl LaunchEra {
    pub fn from_year(year: i32) -> Self {
        if year < 1970 {
            LaunchEra::EarlySpaceAge
        } else if year < 1990 {
            LaunchEra::ColdWarEra
        } else if year < 2010 {
            LaunchEra::PostColdWar
        } else {
            LaunchEra::CommercialSpace
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LaunchEra::EarlySpaceAge => "Early Space Age",
            LaunchEra::ColdWarEra => "Cold War Era",
            LaunchEra::PostColdWar => "Post-Cold War",
            LaunchEra::CommercialSpace => "Commercial Space",
            LaunchEra::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for LaunchEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LaunchEra {
    type Err = LaunchWxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Early Space Age" => Ok(LaunchEra::EarlySpaceAge),
            "Cold War Era" => Ok(LaunchEra::ColdWarEra),
            "Post-Cold War" => Ok(LaunchEra::PostColdWar),
            "Commercial Space" => Ok(LaunchEra::CommercialSpace),
            "Unknown" => Ok(LaunchEra::Unknown),
            _ => Err(LaunchWxError::InvalidCell {
                column: crate::constants::COL_LAUNCH_ERA.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// `floor(year / 10) * 10`, floored toward negative infinity.
pub fn launch_decade(year: i32) -> i32 {
    year.div_euclid(10) * 10
}
