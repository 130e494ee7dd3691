//! Request options: which period to report, how to sort, and how to show
//! not-viewed traffic.
//!
//! Values arriving from a query string are validated here. Anything that
//! does not validate falls back to a default instead of failing the request.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Month selector of a report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Month {
    /// Every month of the year found on disk
    #[default]
    All,
    /// A single month, 1..=12
    Number(u32),
}

impl Month {
    /// Build a month selector; 0 and out-of-range values mean "all".
    pub fn from_number(n: u32) -> Self {
        if (1..=12).contains(&n) {
            Month::Number(n)
        } else {
            Month::All
        }
    }

    /// Parse a request value. Accepts `all`, `1`..`12` and `01`..`12`;
    /// everything else (including empty and `0`) means "all".
    pub fn parse_param(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.len() > 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Month::All;
        }
        value.parse().map(Month::from_number).unwrap_or(Month::All)
    }

    /// Two-digit form used in data file names (`01`..`12`), or `None` for all.
    pub fn file_part(&self) -> Option<String> {
        match self {
            Month::All => None,
            Month::Number(n) => Some(format!("{:02}", n)),
        }
    }

    /// Value used in links and query strings (`all` or `1`..`12`).
    pub fn param(&self) -> String {
        match self {
            Month::All => "all".to_string(),
            Month::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.param())
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Month::All => serializer.serialize_str("all"),
            Month::Number(n) => serializer.serialize_u32(*n),
        }
    }
}

/// A (year, month) report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Every month of `year`.
    pub fn year(year: i32) -> Self {
        Self::new(year, Month::All)
    }
}

/// The calendar year in the local time zone.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Parse a request year: exactly four ASCII digits.
pub fn parse_year_param(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}

/// Column a report can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    /// Site config name (ascending)
    Config,
    Visits,
    Unique,
    Pages,
    Hits,
    #[default]
    Bandwidth,
    NotViewedPages,
    NotViewedHits,
    NotViewedBandwidth,
}

impl SortColumn {
    pub const ALL: [SortColumn; 9] = [
        SortColumn::Config,
        SortColumn::Visits,
        SortColumn::Unique,
        SortColumn::Pages,
        SortColumn::Hits,
        SortColumn::Bandwidth,
        SortColumn::NotViewedPages,
        SortColumn::NotViewedHits,
        SortColumn::NotViewedBandwidth,
    ];

    /// Name used in the `sort` request parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Config => "config",
            SortColumn::Visits => "visits",
            SortColumn::Unique => "unique",
            SortColumn::Pages => "pages",
            SortColumn::Hits => "hits",
            SortColumn::Bandwidth => "bandwidth",
            SortColumn::NotViewedPages => "not_viewed_pages",
            SortColumn::NotViewedHits => "not_viewed_hits",
            SortColumn::NotViewedBandwidth => "not_viewed_bandwidth",
        }
    }

    /// Whether the table shows this column in `mode`.
    pub fn is_shown(&self, mode: NotViewedMode) -> bool {
        match self {
            SortColumn::NotViewedPages
            | SortColumn::NotViewedHits
            | SortColumn::NotViewedBandwidth => mode == NotViewedMode::Columns,
            _ => true,
        }
    }

    /// Parse a request value restricted to `[a-z_]`.
    pub fn parse_param(value: &str) -> Option<Self> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
            return None;
        }
        value.parse().ok()
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown sort column: {}", s))
    }
}

/// How not-viewed traffic (robots, filtered agents) is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotViewedMode {
    /// Drop not-viewed figures from the table and the totals
    Ignore,
    /// Show not-viewed figures in their own columns
    Columns,
    /// Add not-viewed figures to the viewed ones
    #[default]
    Sum,
}

impl NotViewedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotViewedMode::Ignore => "ignore",
            NotViewedMode::Columns => "columns",
            NotViewedMode::Sum => "sum",
        }
    }
}

impl FromStr for NotViewedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(NotViewedMode::Ignore),
            "columns" => Ok(NotViewedMode::Columns),
            "sum" => Ok(NotViewedMode::Sum),
            _ => Err(format!("Unknown not-viewed mode: {}", s)),
        }
    }
}

/// Validated request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParams {
    pub period: Period,
    pub sort: SortColumn,
}

impl RequestParams {
    /// Parameters for the current year, all months, default sort.
    pub fn defaults(default_sort: SortColumn) -> Self {
        Self {
            period: Period::year(current_year()),
            sort: default_sort,
        }
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Unknown keys are ignored; invalid values fall back to the current
    /// year, all months and `default_sort`.
    pub fn from_query(query: &str, default_sort: SortColumn) -> Self {
        let mut params = Self::defaults(default_sort);
        let query = query.trim_start_matches('?');

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "year" => {
                    if let Some(year) = parse_year_param(&value) {
                        params.period.year = year;
                    }
                }
                "month" => params.period.month = Month::parse_param(&value),
                "sort" => {
                    if let Some(sort) = SortColumn::parse_param(&value) {
                        params.sort = sort;
                    }
                }
                _ => {}
            }
        }

        params
    }

    /// Render the parameters back into a query string.
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("year", &self.period.year.to_string())
            .append_pair("month", &self.period.month.param())
            .append_pair("sort", self.sort.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_parse_param() {
        assert_eq!(Month::parse_param("3"), Month::Number(3));
        assert_eq!(Month::parse_param("03"), Month::Number(3));
        assert_eq!(Month::parse_param("12"), Month::Number(12));
        assert_eq!(Month::parse_param("0"), Month::All);
        assert_eq!(Month::parse_param("13"), Month::All);
        assert_eq!(Month::parse_param("all"), Month::All);
        assert_eq!(Month::parse_param(""), Month::All);
        assert_eq!(Month::parse_param("-1"), Month::All);
    }

    #[test]
    fn test_month_file_part() {
        assert_eq!(Month::Number(1).file_part().as_deref(), Some("01"));
        assert_eq!(Month::Number(11).file_part().as_deref(), Some("11"));
        assert_eq!(Month::All.file_part(), None);
    }

    #[test]
    fn test_parse_year_param() {
        assert_eq!(parse_year_param("2024"), Some(2024));
        assert_eq!(parse_year_param("24"), None);
        assert_eq!(parse_year_param("20245"), None);
        assert_eq!(parse_year_param("20x4"), None);
    }

    #[test]
    fn test_sort_column_parse_param() {
        assert_eq!(SortColumn::parse_param("hits"), Some(SortColumn::Hits));
        assert_eq!(
            SortColumn::parse_param("not_viewed_bandwidth"),
            Some(SortColumn::NotViewedBandwidth)
        );
        assert_eq!(SortColumn::parse_param("config"), Some(SortColumn::Config));
        assert_eq!(SortColumn::parse_param("Hits"), None);
        assert_eq!(SortColumn::parse_param("hits;drop"), None);
        assert_eq!(SortColumn::parse_param("unknown"), None);
    }

    #[test]
    fn test_sort_column_round_trip_names() {
        for column in SortColumn::ALL {
            assert_eq!(column.as_str().parse::<SortColumn>().unwrap(), column);
        }
    }

    #[test]
    fn test_sort_column_is_shown() {
        assert!(SortColumn::Hits.is_shown(NotViewedMode::Sum));
        assert!(SortColumn::NotViewedHits.is_shown(NotViewedMode::Columns));
        assert!(!SortColumn::NotViewedHits.is_shown(NotViewedMode::Sum));
        assert!(!SortColumn::NotViewedBandwidth.is_shown(NotViewedMode::Ignore));
    }

    #[test]
    fn test_not_viewed_mode_from_str() {
        assert_eq!("sum".parse::<NotViewedMode>().unwrap(), NotViewedMode::Sum);
        assert_eq!(
            "Columns".parse::<NotViewedMode>().unwrap(),
            NotViewedMode::Columns
        );
        assert_eq!(
            "ignore".parse::<NotViewedMode>().unwrap(),
            NotViewedMode::Ignore
        );
        assert!("both".parse::<NotViewedMode>().is_err());
    }

    #[test]
    fn test_request_params_from_query() {
        let params = RequestParams::from_query("year=2023&month=4&sort=hits", SortColumn::Bandwidth);
        assert_eq!(params.period, Period::new(2023, Month::Number(4)));
        assert_eq!(params.sort, SortColumn::Hits);
    }

    #[test]
    fn test_request_params_invalid_values_fall_back() {
        let params = RequestParams::from_query(
            "?year=abcd&month=99&sort=DROP%20TABLE",
            SortColumn::Visits,
        );
        assert_eq!(params.period.year, current_year());
        assert_eq!(params.period.month, Month::All);
        assert_eq!(params.sort, SortColumn::Visits);
    }

    #[test]
    fn test_request_params_to_query() {
        let params = RequestParams {
            period: Period::new(2024, Month::All),
            sort: SortColumn::NotViewedHits,
        };
        assert_eq!(params.to_query(), "year=2024&month=all&sort=not_viewed_hits");
    }
}
