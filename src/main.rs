//! launchwx CLI
//!
//! Enrich a rocket-launch CSV with launch-day weather and derived features.

use std::{process::ExitCode, time::Duration};

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use launchwx::{
    constants::DEFAULT_PROGRESS_EVERY,
    pipeline::{DEFAULT_INPUT, DEFAULT_OUTPUT},
    CacheConfig, Pipeline, PipelineConfig, ProviderSpec,
};

#[derive(Parser)]
#[command(name = "launchwx")]
#[command(about = "Enrich rocket launch records with historical weather", long_about = None)]
struct Cli {
    /// Raw launch dataset (CSV with header)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: Utf8PathBuf,

    /// Destination of the enriched dataset
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: Utf8PathBuf,

    /// Weather provider: open-meteo, open-meteo:<url>, synthetic, synthetic:<seed>, offline
    #[arg(short, long, default_value = "synthetic")]
    weather: ProviderSpec,

    /// Log a progress line every N records (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    progress_every: usize,

    /// Weather cache file (defaults to the user cache directory)
    #[arg(long, conflicts_with = "no_cache")]
    cache_file: Option<Utf8PathBuf>,

    /// Do not read or write the weather cache
    #[arg(long)]
    no_cache: bool,

    /// Pause before each remote weather request, in milliseconds
    #[arg(long, default_value_t = 0)]
    request_delay_ms: u64,

    /// Extra attempts after a failed remote weather request
    #[arg(long, default_value_t = 2)]
    max_retries: u32,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let cache = match (self.no_cache, self.cache_file) {
            (true, _) => CacheConfig::Disabled,
            (false, Some(path)) => CacheConfig::File(path),
            (false, None) => CacheConfig::DefaultFile,
        };

        PipelineConfig {
            input: self.input,
            output: self.output,
            provider: self.weather,
            progress_every: self.progress_every,
            cache,
            request_delay: Duration::from_millis(self.request_delay_ms),
            max_retries: self.max_retries,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();

    let result = Pipeline::new(config).and_then(|mut pipeline| pipeline.run());
    match result {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Launch weather enrichment failed: {err}");
            ExitCode::FAILURE
        }
    }
}
