//! Query processing: select, merge and sort report rows.
//!
//! This module handles the third stage of the pipeline - turning the
//! per-file aggregates of a period into report rows. It provides:
//!
//! - **Options**: request parameters (`Period`, `SortColumn`, `NotViewedMode`)
//! - **Report**: merged, totalled and sorted rows ready for presentation
//!
//! ## Example
//!
//! ```rust,ignore
//! use awstotalslib::query::{build_report, NotViewedMode, Period, SortColumn};
//!
//! let report = build_report(&cfg, Period::year(2024), SortColumn::Visits, NotViewedMode::Sum)?;
//! ```

pub mod options;
pub mod report;

pub use options::{current_year, Month, NotViewedMode, Period, RequestParams, SortColumn};
pub use report::{available_years, build_report, configs_and_files, MatchedFile, Report};
