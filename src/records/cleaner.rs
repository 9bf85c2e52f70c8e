//! # Record cleaning
//!
//! Turns a [`RawTable`] into a [`CleanedTable`]:
//!
//! 1. Drop index-artifact columns (`Unnamed: 0`, or an unnamed first column).
//! 2. Split `Detail` on the first `|` into `RocketModel` and `Payload`, both trimmed.
//!    Text without a `|` becomes the `RocketModel` with no `Payload`.
//! 3. Rename the price column (`Rocket` / `" Rocket"`) to `LaunchPriceM` and coerce it to a
//!    number; text that is not a finite decimal number becomes absent.
//! 4. Parse `Datum` into a date-time; unparsable text becomes absent.
//! 5. Encode the mission status twice (see [`mission`](crate::records::mission)).
//!
//! No step fails on bad data: every per-record problem yields an absent value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::{
    mission::{encode_mission_probability, encode_mission_status},
    CleanedRecord, CleanedTable, ColumnLayout, LaunchRecord, RawTable,
};

/// Layouts with a time of day, tried in order.
const DATETIME_FORMATS: [&str; 6] = [
    "%b %d, %Y %H:%M UTC",
    "%b %d, %Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Split a `Detail` value into `(RocketModel, Payload)`.
///
/// Empty halves are absent. `"Falcon 9 Block 5 | Starlink V1 L9"` gives
/// `(Some("Falcon 9 Block 5"), Some("Starlink V1 L9"))`; `"Vostok"` gives `(Some("Vostok"), None)`.
pub fn split_detail(detail: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(detail) = detail else {
        return (None, None);
    };

    let non_empty = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(String::from);

    match detail.split_once('|') {
        Some((model, payload)) => (non_empty(model), non_empty(payload)),
        None => (non_empty(detail), None),
    }
}

/// Coerce a price cell to millions of dollars.
pub fn parse_price(price: Option<&str>) -> Option<f64> {
    price?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
}

/// Parse a launch date.
///
/// Accepted layouts include the dataset's `"Fri Aug 07, 2020 05:12 UTC"` and
/// `"Fri Aug 07, 2020"`, RFC 3339, ISO date-times with `T` or a space, and ISO dates.
/// A leading weekday name is ignored. A date without time of day is placed at midnight.
pub fn parse_launch_date(datum: Option<&str>) -> Option<NaiveDateTime> {
    let datum = datum?.trim();
    if datum.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(datum) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(datum, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc());
    }

    let text = strip_weekday(datum);

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Drop a leading `"Fri "`-style weekday token.
fn strip_weekday(datum: &str) -> &str {
    match datum.split_once(' ') {
        Some((first, rest))
            if (3..=9).contains(&first.len())
                && first.chars().all(|c| c.is_ascii_alphabetic())
                && rest.starts_with(|c: char| c.is_ascii_alphabetic()) =>
        {
            rest.trim_start()
        }
        _ => datum,
    }
}

/// Normalize one record.
pub fn clean_record(record: LaunchRecord) -> CleanedRecord {
    let (rocket_model, payload) = split_detail(record.detail.as_deref());
    let status = record.status_mission.as_deref();

    CleanedRecord {
        rocket_model,
        payload,
        launch_price_m: parse_price(record.price.as_deref()),
        launch_date: parse_launch_date(record.datum.as_deref()),
        mission_success: encode_mission_status(status),
        mission_success_prob: encode_mission_probability(status),
        record,
    }
}

/// Normalize a whole table, keeping row order.
pub fn clean_table(table: &RawTable) -> CleanedTable {
    let layout = ColumnLayout::from_headers(table.headers());
    let records = table.records(&layout).map(clean_record).collect();
    CleanedTable { layout, records }
}

#[cfg(test)]
mod cleaner_tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_split_detail() {
        assert_eq!(
            split_detail(Some("Falcon 9 Block 5 | Starlink V1 L9 & BlackSky")),
            (
                Some("Falcon 9 Block 5".into()),
                Some("Starlink V1 L9 & BlackSky".into())
            )
        );
        // only the first delimiter splits
        assert_eq!(
            split_detail(Some("Long March 2D | Gaofen-9 04 | Q-SAT")),
            (
                Some("Long March 2D".into()),
                Some("Gaofen-9 04 | Q-SAT".into())
            )
        );
    }

    #[test]
    fn test_split_detail_without_delimiter() {
        assert_eq!(split_detail(Some(" Vostok ")), (Some("Vostok".into()), None));
        assert_eq!(split_detail(Some("Vostok |")), (Some("Vostok".into()), None));
        assert_eq!(split_detail(None), (None, None));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(Some("50.0 ")), Some(50.0));
        assert_eq!(parse_price(Some("  7")), Some(7.0));
        assert_eq!(parse_price(Some("5,000.0")), None);
        assert_eq!(parse_price(Some("n/a")), None);
        assert_eq!(parse_price(Some("NaN")), None);
        assert_eq!(parse_price(Some("inf")), None);
        assert_eq!(parse_price(None), None);
    }

    #[test]
    fn test_parse_dataset_dates() {
        let dt = parse_launch_date(Some("Fri Aug 07, 2020 05:12 UTC")).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2020, 8, 7));
        assert_eq!((dt.hour(), dt.minute()), (5, 12));

        let d = parse_launch_date(Some("Wed Apr 12, 1961")).unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (1961, 4, 12, 0));
    }

    #[test]
    fn test_parse_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(1969, 7, 16)
            .unwrap()
            .and_hms_opt(13, 32, 0)
            .unwrap();
        for text in [
            "1969-07-16 13:32:00",
            "1969-07-16T13:32:00",
            "1969-07-16T13:32:00Z",
            "1969-07-16 13:32:00+00:00",
        ] {
            assert_eq!(parse_launch_date(Some(text)), Some(expected), "{text}");
        }
        assert_eq!(
            parse_launch_date(Some("1969-07-16")),
            NaiveDate::from_ymd_opt(1969, 7, 16).map(|d| d.and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn test_unparsable_dates_are_absent() {
        assert_eq!(parse_launch_date(Some("sometime in 1957")), None);
        assert_eq!(parse_launch_date(Some("Fri Feb 30, 2020")), None);
        assert_eq!(parse_launch_date(Some("   ")), None);
        assert_eq!(parse_launch_date(None), None);
    }

    #[test]
    fn test_whitespace_status_is_absent() {
        let layout = ColumnLayout::from_headers(&[
            "Location".to_string(),
            "Status Mission".to_string(),
        ]);
        let cleaned = clean_record(layout.record(&["Baikonur".to_string(), "   ".to_string()]));
        assert_eq!(cleaned.record.status_mission, None);
        assert_eq!(cleaned.mission_success, None);
        assert_eq!(cleaned.mission_success_prob, None);
    }

    #[test]
    fn test_clean_table() {
        let data = "\
Unnamed: 0,Company Name,Location,Datum,Detail,Status Rocket, Rocket,Status Mission
0,SpaceX,\"LC-39A, Kennedy Space Center, Florida, USA\",\"Fri Aug 07, 2020 05:12 UTC\",Falcon 9 Block 5 | Starlink V1 L9,StatusActive,50.0 ,Success
1,RVSN USSR,\"Site 1/5, Baikonur Cosmodrome, Kazakhstan\",\"Wed Apr 12, 1961 06:07 UTC\",Vostok,StatusRetired,,Partial Failure
2,Unknown,Atlantis,not a date,,StatusRetired,\"1,000.0\",
";
        let table = RawTable::from_reader(data.as_bytes()).unwrap();
        let cleaned = clean_table(&table);

        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned.layout.passthrough.len(), 6);
        assert_eq!(cleaned.layout.price_position, Some(5));

        let spacex = &cleaned.records[0];
        assert_eq!(spacex.rocket_model.as_deref(), Some("Falcon 9 Block 5"));
        assert_eq!(spacex.payload.as_deref(), Some("Starlink V1 L9"));
        assert_eq!(spacex.launch_price_m, Some(50.0));
        assert_eq!(spacex.mission_success, Some(1));
        assert_eq!(spacex.mission_success_prob, Some(1.0));

        let vostok = &cleaned.records[1];
        assert_eq!(vostok.rocket_model.as_deref(), Some("Vostok"));
        assert_eq!(vostok.payload, None);
        assert_eq!(vostok.launch_price_m, None);
        assert_eq!(vostok.mission_success, Some(0));
        assert_eq!(vostok.mission_success_prob, Some(0.5));

        let unknown = &cleaned.records[2];
        assert_eq!(unknown.launch_date, None);
        assert_eq!(unknown.rocket_model, None);
        assert_eq!(unknown.launch_price_m, None);
        assert_eq!(unknown.mission_success, None);
        assert_eq!(unknown.mission_success_prob, None);
    }
}
