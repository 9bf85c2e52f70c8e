//! # Launch records
//!
//! Raw input rows and their cleaned form.
//!
//! ## Data flow
//!
//! ```text
//! CSV file ──► RawTable ──► LaunchRecord (per row) ──► CleanedRecord
//!                  │                                        ▲
//!                  └──────── ColumnLayout ───────────────────┘
//! ```
//!
//! - [`RawTable`] holds the header and the untyped cells exactly as read.
//! - [`ColumnLayout`] is computed once from the header: which columns pass through to the
//!   output, which one is the price column, and where the typed fields live.
//! - [`LaunchRecord`] is one input row: its passthrough cells plus the typed text fields
//!   (`Location`, `Detail`, price, `Datum`, `Status Mission`), each absent when blank.
//! - [`CleanedRecord`] adds the normalized values produced by
//!   [`clean_record`](crate::records::cleaner::clean_record).
//!
//! An empty or whitespace-only cell is an absent value for every typed field.

pub mod cleaner;
pub mod mission;

use std::io::Read;

use camino::Utf8Path;
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use tracing::warn;

use crate::{
    constants::{
        COL_DATUM, COL_DETAIL, COL_LAUNCH_PRICE, COL_LOCATION, COL_RAW_PRICE, COL_STATUS_MISSION,
        INDEX_ARTIFACT_COLUMNS,
    },
    launchwx_errors::LaunchWxError,
};

/// An input table: header plus rows of raw cells, all rows padded to the header width.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        RawTable { headers, rows }
    }

    /// Read a CSV file with a header row.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: Path of the CSV file.
    ///
    /// Return
    /// ----------
    /// * The table, or a [`LaunchWxError`] if the file cannot be opened or parsed, or has
    ///   no header. Short or long rows are tolerated (padded or truncated).
    pub fn from_path(path: &Utf8Path) -> Result<Self, LaunchWxError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file).map_err(|err| match err {
            LaunchWxError::MissingHeader(_) => LaunchWxError::MissingHeader(path.to_string()),
            other => other,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LaunchWxError> {
        let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        if headers.is_empty() {
            return Err(LaunchWxError::MissingHeader("<reader>".to_string()));
        }

        let rows = csv_reader
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(RawTable::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split every row into a [`LaunchRecord`] according to `layout`.
    pub fn records<'a>(
        &'a self,
        layout: &'a ColumnLayout,
    ) -> impl Iterator<Item = LaunchRecord> + 'a {
        self.rows.iter().map(move |row| layout.record(row))
    }
}

/// Is `name` a leftover dataframe index column?
pub(crate) fn is_index_artifact(position: usize, name: &str) -> bool {
    INDEX_ARTIFACT_COLUMNS.contains(&name) || (position == 0 && name.trim().is_empty())
}

/// Is `name` the raw price column (`Rocket`, with any surrounding whitespace)?
pub(crate) fn is_price_column(name: &str) -> bool {
    name.trim() == COL_RAW_PRICE || name == COL_LAUNCH_PRICE
}

/// Where the typed fields and passthrough columns of a table live.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Names of the passthrough columns, in input order. Excludes dropped index columns
    /// and the price column.
    pub passthrough: Vec<String>,
    /// Position, among `passthrough`, at which `LaunchPriceM` is emitted. `None` when the
    /// input has no price column: `LaunchPriceM` is then appended after `Payload`.
    pub price_position: Option<usize>,

    passthrough_idx: Vec<usize>,
    price_idx: Option<usize>,
    location_idx: Option<usize>,
    detail_idx: Option<usize>,
    datum_idx: Option<usize>,
    status_idx: Option<usize>,
}

impl ColumnLayout {
    /// Analyse a header row.
    ///
    /// Columns `Location`, `Datum` and `Status Mission` are expected; when one is missing
    /// a warning is logged and the field is absent on every record.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut layout = ColumnLayout {
            passthrough: Vec::new(),
            price_position: None,
            passthrough_idx: Vec::new(),
            price_idx: None,
            location_idx: None,
            detail_idx: None,
            datum_idx: None,
            status_idx: None,
        };

        for (idx, name) in headers.iter().enumerate() {
            if is_index_artifact(idx, name) {
                continue;
            }
            if layout.price_idx.is_none() && is_price_column(name) {
                layout.price_idx = Some(idx);
                layout.price_position = Some(layout.passthrough.len());
                continue;
            }

            match name.as_str() {
                COL_LOCATION => layout.location_idx = Some(idx),
                COL_DETAIL => layout.detail_idx = Some(idx),
                COL_DATUM => layout.datum_idx = Some(idx),
                COL_STATUS_MISSION => layout.status_idx = Some(idx),
                _ => {}
            }
            layout.passthrough.push(name.clone());
            layout.passthrough_idx.push(idx);
        }

        for (name, idx) in [
            (COL_LOCATION, layout.location_idx),
            (COL_DATUM, layout.datum_idx),
            (COL_STATUS_MISSION, layout.status_idx),
        ] {
            if idx.is_none() {
                warn!("Input has no '{name}' column, the field is treated as absent");
            }
        }

        layout
    }

    pub fn has_price_column(&self) -> bool {
        self.price_idx.is_some()
    }

    /// Extract one [`LaunchRecord`] from a raw row.
    pub fn record(&self, row: &[String]) -> LaunchRecord {
        let cell = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        LaunchRecord {
            cells: self
                .passthrough_idx
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect(),
            location: cell(self.location_idx),
            detail: cell(self.detail_idx),
            price: cell(self.price_idx),
            datum: cell(self.datum_idx),
            status_mission: cell(self.status_idx),
        }
    }
}

/// One input row.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    /// Passthrough cells, aligned with [`ColumnLayout::passthrough`].
    pub cells: Vec<String>,
    /// Free-text launch location.
    pub location: Option<String>,
    /// Rocket model and payload, `|`-delimited.
    pub detail: Option<String>,
    /// Raw price text, in millions of dollars.
    pub price: Option<String>,
    /// Raw launch date text.
    pub datum: Option<String>,
    /// Raw mission status text.
    pub status_mission: Option<String>,
}

/// A launch record with its normalized fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub record: LaunchRecord,
    pub rocket_model: Option<String>,
    pub payload: Option<String>,
    pub launch_price_m: Option<f64>,
    pub launch_date: Option<NaiveDateTime>,
    pub mission_success: Option<u8>,
    pub mission_success_prob: Option<f64>,
}

/// Cleaned records in input order, with the column layout they were read with.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    pub layout: ColumnLayout,
    pub records: Vec<CleanedRecord>,
}

impl CleanedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod records_tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layout_drops_index_and_moves_price() {
        let layout = ColumnLayout::from_headers(&headers(&[
            "Unnamed: 0",
            "Company Name",
            "Location",
            "Datum",
            "Detail",
            "Status Rocket",
            " Rocket",
            "Status Mission",
        ]));
        assert_eq!(
            layout.passthrough,
            headers(&[
                "Company Name",
                "Location",
                "Datum",
                "Detail",
                "Status Rocket",
                "Status Mission"
            ])
        );
        assert_eq!(layout.price_position, Some(5));
        assert!(layout.has_price_column());
    }

    #[test]
    fn test_unnamed_first_column_is_an_index() {
        let layout = ColumnLayout::from_headers(&headers(&["", "Location", "Datum"]));
        assert_eq!(layout.passthrough, headers(&["Location", "Datum"]));
        assert_eq!(layout.price_position, None);
    }

    #[test]
    fn test_record_extraction_blank_is_absent() {
        let layout =
            ColumnLayout::from_headers(&headers(&["Location", "Detail", "Rocket", "Datum"]));
        let row = headers(&["  Kourou, French Guiana ", "", " 37.0 ", "Fri Aug 07, 2020"]);
        let rec = layout.record(&row);
        assert_eq!(rec.location.as_deref(), Some("Kourou, French Guiana"));
        assert_eq!(rec.detail, None);
        assert_eq!(rec.price.as_deref(), Some("37.0"));
        assert_eq!(rec.status_mission, None);
        // passthrough cells are kept verbatim
        assert_eq!(rec.cells, headers(&["  Kourou, French Guiana ", "", "Fri Aug 07, 2020"]));
    }

    #[test]
    fn test_raw_table_pads_short_rows() {
        let data = "Location,Datum,Status Mission\nKourou,\"Fri Aug 07, 2020\"\n";
        let table = RawTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[0][2], "");
    }

    #[test]
    fn test_raw_table_empty_input() {
        assert_eq!(
            RawTable::from_reader("".as_bytes()),
            Err(LaunchWxError::MissingHeader("<reader>".into()))
        );
    }
}
