//! Console summary of a pipeline run.
//!
//! [`DatasetSummary`] is advisory: it reports where the dataset was written, its shape, the
//! mission success rate and how weather lookups went. It renders as a `comfy-table` table:
//!
//! ```text
//! ┌──────────────────┬───────────────────────────────────────────────┐
//! │ Output           ┆ data/processed/rocket_launches_with_weather…  │
//! ├╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┼╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┤
//! │ Shape            ┆ 4324 rows × 24 columns                        │
//! │ Success rate     ┆ 89.72%                                        │
//! │ Weather precise  ┆ 3998                                          │
//! │ …                ┆ …                                             │
//! └──────────────────┴───────────────────────────────────────────────┘
//! ```

use std::fmt;

use camino::Utf8PathBuf;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{enriched::EnrichedTable, weather::WeatherStats};

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub output: Utf8PathBuf,
    pub rows: usize,
    pub columns: usize,
    /// Share of successes among launches with a known outcome, in `[0, 1]`.
    pub success_rate: Option<f64>,
    pub weather: WeatherStats,
}

impl DatasetSummary {
    pub fn from_table(table: &EnrichedTable, output: Utf8PathBuf, weather: WeatherStats) -> Self {
        DatasetSummary {
            output,
            rows: table.len(),
            columns: table.column_count(),
            success_rate: table.success_rate(),
            weather,
        }
    }

    fn render(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![Cell::new("Dataset"), Cell::new("Value")]);

        let success = self
            .success_rate
            .map_or_else(|| "n/a".to_string(), |r| format!("{:.2}%", r * 100.0));

        let lines = [
            ("Output", self.output.to_string()),
            (
                "Shape",
                format!("{} rows × {} columns", self.rows, self.columns),
            ),
            ("Success rate", success),
            ("Weather precise", self.weather.precise.to_string()),
            ("Weather missing", self.weather.missing.to_string()),
            ("Cache hits", self.weather.cache_hits.to_string()),
            ("Provider fetches", self.weather.fetches.to_string()),
            ("Provider failures", self.weather.failures.to_string()),
        ];
        for (label, value) in lines {
            table.add_row(Row::from(vec![
                Cell::new(label),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod display_tests {
    use super::*;

    #[test]
    fn test_render_contains_figures() {
        let summary = DatasetSummary {
            output: Utf8PathBuf::from("out/launches.csv"),
            rows: 3,
            columns: 24,
            success_rate: Some(2.0 / 3.0),
            weather: WeatherStats {
                precise: 2,
                missing: 1,
                cache_hits: 1,
                fetches: 1,
                failures: 0,
            },
        };
        let text = summary.to_string();
        assert!(text.contains("out/launches.csv"));
        assert!(text.contains("3 rows × 24 columns"));
        assert!(text.contains("66.67%"));
        assert!(text.contains("Weather missing"));
    }

    #[test]
    fn test_render_without_outcomes() {
        let summary = DatasetSummary {
            output: Utf8PathBuf::from("x.csv"),
            rows: 0,
            columns: 20,
            success_rate: None,
            weather: WeatherStats::default(),
        };
        assert!(summary.to_string().contains("n/a"));
    }
}
