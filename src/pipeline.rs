//! # Enrichment pipeline
//!
//! Batch orchestration: load the raw launch table, clean it, attach weather and derived
//! features to every record, persist the result and report a [`DatasetSummary`].
//!
//! ```text
//! RawTable ──clean──► CleanedTable ──enrich──► EnrichedTable ──write_csv──► output file
//!                                     │
//!                       SiteRegistry ─┤─ WeatherService (provider + cache)
//! ```
//!
//! Records are processed strictly in input order and one at a time; the output row order is
//! the input row order. Per-record problems (unparsable date, unknown site, provider
//! failure) never abort the batch: they yield absent values. Only an unreadable input, an
//! unbuildable provider or an unwritable output stop a run. A weather cache that cannot be
//! saved is logged and the run still succeeds.
//!
//! ## Example
//!
//! ```rust, no_run
//! use launchwx::pipeline::{Pipeline, PipelineConfig};
//! use launchwx::weather::ProviderSpec;
//!
//! let config = PipelineConfig {
//!     provider: ProviderSpec::Synthetic { seed: 42 },
//!     ..PipelineConfig::default()
//! };
//! let mut pipeline = Pipeline::new(config)?;
//! let summary = pipeline.run()?;
//! println!("{summary}");
//! # Ok::<(), launchwx::launchwx_errors::LaunchWxError>(())
//! ```

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, warn};

use crate::{
    constants::DEFAULT_PROGRESS_EVERY,
    display::DatasetSummary,
    enriched::{EnrichedLaunchRecord, EnrichedTable},
    features::derive_features,
    launchwx_errors::LaunchWxError,
    progress_bar::ProgressReporter,
    records::{cleaner::clean_table, CleanedRecord, CleanedTable, RawTable},
    sites::SiteRegistry,
    weather::{cache::WeatherCache, ProviderSpec, WeatherProvider, WeatherService},
};

/// Default input dataset.
pub const DEFAULT_INPUT: &str = "data/raw/Space_Corrected.csv";
/// Default enriched dataset.
pub const DEFAULT_OUTPUT: &str = "data/processed/rocket_launches_with_weather_ml_ready.csv";

/// Where weather lookups are memoized between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheConfig {
    /// In-memory only; nothing is read or written.
    Disabled,
    /// `<cache_dir>/launchwx_cache/weather_cache.csv`.
    #[default]
    DefaultFile,
    File(Utf8PathBuf),
}

impl CacheConfig {
    fn open(&self) -> Result<WeatherCache, LaunchWxError> {
        match self {
            CacheConfig::Disabled => Ok(WeatherCache::in_memory()),
            CacheConfig::DefaultFile => Ok(WeatherCache::open(&WeatherCache::default_path()?)),
            CacheConfig::File(path) => Ok(WeatherCache::open(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
    pub provider: ProviderSpec,
    /// Log a progress line every this many records; `0` disables it.
    pub progress_every: usize,
    pub cache: CacheConfig,
    /// Pause before each remote weather request.
    pub request_delay: Duration,
    /// Extra attempts after a failed remote weather request.
    pub max_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: Utf8PathBuf::from(DEFAULT_INPUT),
            output: Utf8PathBuf::from(DEFAULT_OUTPUT),
            provider: ProviderSpec::default(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            cache: CacheConfig::default(),
            request_delay: Duration::ZERO,
            max_retries: 2,
        }
    }
}

/// Enrich one cleaned record: resolve its site, look up its weather, derive its features.
pub fn enrich_record(
    record: &CleanedRecord,
    registry: &SiteRegistry,
    weather: &mut WeatherService,
) -> EnrichedLaunchRecord {
    let coordinates = registry.resolve(record.record.location.as_deref());
    let observation = weather.observe(record.launch_date.map(|d| d.date()), coordinates);
    let features = derive_features(record.launch_date, &observation);

    EnrichedLaunchRecord {
        cleaned: record.clone(),
        weather: observation,
        features,
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    registry: SiteRegistry,
    weather: WeatherService,
}

impl Pipeline {
    /// Build a pipeline with the provider described by `config.provider`.
    ///
    /// Return
    /// ----------
    /// * The pipeline, or a [`LaunchWxError`] if the provider spec cannot be instantiated or
    ///   the default cache directory cannot be created.
    pub fn new(config: PipelineConfig) -> Result<Self, LaunchWxError> {
        let provider = config
            .provider
            .build(config.request_delay, config.max_retries)?;
        let cache = config.cache.open()?;
        Ok(Pipeline {
            weather: WeatherService::new(provider, cache),
            registry: SiteRegistry::default(),
            config,
        })
    }

    /// Build a pipeline around an explicit provider, ignoring `config.provider`.
    pub fn with_provider(
        config: PipelineConfig,
        provider: Box<dyn WeatherProvider>,
    ) -> Result<Self, LaunchWxError> {
        let cache = config.cache.open()?;
        Ok(Pipeline {
            weather: WeatherService::new(Some(provider), cache),
            registry: SiteRegistry::default(),
            config,
        })
    }

    pub fn set_registry(&mut self, registry: SiteRegistry) {
        self.registry = registry;
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &SiteRegistry {
        &self.registry
    }

    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }

    pub fn load(&self) -> Result<RawTable, LaunchWxError> {
        load_table(&self.config.input)
    }

    pub fn clean(&self, table: &RawTable) -> CleanedTable {
        let cleaned = clean_table(table);
        info!(
            "Cleaned {} records ({} passthrough columns)",
            cleaned.len(),
            cleaned.layout.passthrough.len()
        );
        cleaned
    }

    /// Attach weather and derived features to every record, in input order.
    pub fn enrich(&mut self, table: CleanedTable) -> EnrichedTable {
        info!(
            "Enriching {} records with {} weather",
            table.len(),
            self.weather.provider_name()
        );

        let mut progress = ProgressReporter::new(table.len(), self.config.progress_every);
        let records = table
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let enriched = enrich_record(record, &self.registry, &mut self.weather);
                progress.record_done(idx);
                enriched
            })
            .collect();
        progress.finish();

        EnrichedTable {
            layout: table.layout,
            records,
        }
    }

    /// Run the whole batch: load, clean, enrich, write the output, save the cache.
    pub fn run(&mut self) -> Result<DatasetSummary, LaunchWxError> {
        let raw = self.load()?;
        let cleaned = self.clean(&raw);
        let enriched = self.enrich(cleaned);

        enriched.write_csv(&self.config.output)?;
        info!(
            "Wrote {} records to {}",
            enriched.len(),
            self.config.output
        );
        if let Err(err) = self.weather.save_cache() {
            warn!("Weather cache not saved: {err}");
        }

        Ok(DatasetSummary::from_table(
            &enriched,
            self.config.output.clone(),
            self.weather.stats(),
        ))
    }
}

fn load_table(path: &Utf8Path) -> Result<RawTable, LaunchWxError> {
    let table = RawTable::from_path(path)?;
    info!("Loaded {} launch records from {path}", table.len());
    Ok(table)
}
