//! # launchwx
//!
//! Enriches historical rocket-launch records with launch-day weather and engineered
//! features, producing a flat, model-ready CSV dataset.
//!
//! Modules
//! -----------------
//! * [`records`] – Raw table loading and record cleaning.
//! * [`sites`] – Launch-site registry mapping free-text locations to coordinates.
//! * [`weather`] – Weather providers, cache and the per-record lookup policy.
//! * [`features`] – Calendar and weather-quality features.
//! * [`enriched`] – The output dataset, its CSV encoding and the model feature view.
//! * [`pipeline`] – Batch orchestration and configuration.
//! * [`display`] – Console summary of a run.

pub mod constants;
pub mod display;
pub mod enriched;
pub mod features;
pub mod launchwx_errors;
mod persist;
pub mod pipeline;
pub mod progress_bar;
pub mod records;
pub mod sites;
pub mod weather;

pub use display::DatasetSummary;
pub use enriched::{EnrichedLaunchRecord, EnrichedTable, ModelFeatures};
pub use launchwx_errors::LaunchWxError;
pub use pipeline::{enrich_record, CacheConfig, Pipeline, PipelineConfig};
pub use sites::{Coordinates, SiteRegistry};
pub use weather::{ProviderSpec, WeatherObservation, WeatherProvenance, WeatherProvider};
