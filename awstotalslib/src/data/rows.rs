//! Row decoders for the sections of an AWStats database file.
//!
//! Decoding is total: a missing field becomes 0 (or an empty string) and a
//! non-numeric field becomes 0, so one damaged row never aborts a report.

use serde::Serialize;

/// Numeric field at `index`, or 0.
fn num(fields: &[&str], index: usize) -> u64 {
    fields
        .get(index)
        .and_then(|f| f.parse().ok())
        .unwrap_or(0)
}

/// Text field at `index`, or an empty string.
fn text(fields: &[&str], index: usize) -> String {
    fields.get(index).map(|f| f.to_string()).unwrap_or_default()
}

/// Value of a `key value` row in the GENERAL section.
///
/// Returns `None` when the key is absent or its value is not a number.
pub fn general_value<S: AsRef<str>>(rows: &[S], key: &str) -> Option<u64> {
    rows.iter().find_map(|row| {
        let mut fields = row.as_ref().split_whitespace();
        if fields.next() == Some(key) {
            fields.next().and_then(|v| v.parse().ok())
        } else {
            None
        }
    })
}

/// One row of the TIME section (traffic for one hour of the day).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRow {
    pub hour: u64,
    pub pages: u64,
    pub hits: u64,
    pub bandwidth: u64,
    pub not_viewed_pages: u64,
    pub not_viewed_hits: u64,
    pub not_viewed_bandwidth: u64,
}

impl TimeRow {
    pub fn parse(line: &str) -> Self {
        let f: Vec<&str> = line.split_whitespace().collect();
        Self {
            hour: num(&f, 0),
            pages: num(&f, 1),
            hits: num(&f, 2),
            bandwidth: num(&f, 3),
            not_viewed_pages: num(&f, 4),
            not_viewed_hits: num(&f, 5),
            not_viewed_bandwidth: num(&f, 6),
        }
    }
}

/// One row of the DAY section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayRow {
    /// `yyyymmdd`
    pub date: String,
    pub pages: u64,
    pub hits: u64,
    pub bandwidth: u64,
    pub visits: u64,
}

impl DayRow {
    pub fn parse(line: &str) -> Self {
        let f: Vec<&str> = line.split_whitespace().collect();
        Self {
            date: text(&f, 0),
            pages: num(&f, 1),
            hits: num(&f, 2),
            bandwidth: num(&f, 3),
            visits: num(&f, 4),
        }
    }
}

/// One row of the SIDER section (traffic per page URL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageRow {
    pub url: String,
    pub pages: u64,
    pub bandwidth: u64,
    /// Visits that started on this page
    pub entry: u64,
    /// Visits that ended on this page
    pub exit: u64,
}

impl PageRow {
    pub fn parse(line: &str) -> Self {
        let f: Vec<&str> = line.split_whitespace().collect();
        Self {
            url: text(&f, 0),
            pages: num(&f, 1),
            bandwidth: num(&f, 2),
            entry: num(&f, 3),
            exit: num(&f, 4),
        }
    }
}

/// One row of the SIDER_404 section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotFoundRow {
    pub url: String,
    pub hits: u64,
    /// Last referer, `-` when AWStats saw none
    pub referer: String,
}

impl NotFoundRow {
    pub fn parse(line: &str) -> Self {
        let f: Vec<&str> = line.split_whitespace().collect();
        Self {
            url: text(&f, 0),
            hits: num(&f, 1),
            referer: text(&f, 2),
        }
    }
}
