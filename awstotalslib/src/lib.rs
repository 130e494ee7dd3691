//! # awstotalslib
//!
//! Totals over many AWStats sites: read AWStats' per-site, per-month
//! database files, sum them for a year or a month, and render the result
//! as a sortable HTML table.
//!
//! ## Overview
//!
//! AWStats keeps one text database per site and month, named
//! `awstats<MM><YYYY>.<config>.txt`, with named sections such as
//! `GENERAL`, `TIME` and `DAY`. This library:
//!
//! - **Scans** the data directory (recursively) for those files
//! - **Parses** the sections it needs, tolerating damaged or missing data
//! - **Aggregates** visits, unique visitors, pages, hits and bandwidth per site
//! - **Merges** the months of a year into one row per site, with grand totals
//! - **Renders** an HTML page with a period form and sortable columns
//!
//! Not-viewed traffic (robots and filtered agents) can be ignored, shown in
//! separate columns, or summed into the viewed figures.
//!
//! ## Example
//!
//! ```rust
//! use awstotalslib::{build_report, NotViewedMode, Period, ReportConfig, SortColumn};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(
//!     dir.path().join("awstats012024.www.example.com.txt"),
//!     "BEGIN_GENERAL 1\nTotalVisits 12\nEND_GENERAL\nBEGIN_TIME 1\n0 5 9 2048 1 1 10\nEND_TIME\n",
//! ).unwrap();
//!
//! let cfg = ReportConfig::new().with_data_dir(dir.path());
//! let report = build_report(&cfg, Period::year(2024), SortColumn::Visits, NotViewedMode::Ignore).unwrap();
//! assert_eq!(report.rows.len(), 1);
//! assert_eq!(report.rows[0].visits, Some(12));
//! assert_eq!(report.totals.pages, 5);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod query;
pub mod source;

pub use config::ReportConfig;
pub use data::{
    block_lines, month_data, month_totals, not_found_data, page_data, resolve_file, year_data,
    DayTotals, NotFoundRow, PageRow, PeriodAggregate,
};
pub use error::AwstotalsError;
pub use output::{render_page, Labels, NumberFormat, PageContext};
pub use query::{
    available_years, build_report, configs_and_files, current_year, Month, NotViewedMode, Period,
    Report, RequestParams, SortColumn,
};
pub use source::{list_files, SiteFilter};

/// Result type for awstotalslib operations
pub type Result<T> = std::result::Result<T, AwstotalsError>;
