//! Data collection: parse AWStats database files and derive figures.
//!
//! This module handles the second stage of the pipeline - reading the
//! sections of each database file and turning their rows into numbers.
//! It provides:
//!
//! - **Parsing**: section extraction (`block_lines`) and row decoders
//! - **Statistics**: core data structures (`PeriodAggregate`, `DayTotals`)
//! - **Aggregation**: per-site API (`month_totals`, `year_data`, `month_data`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use awstotalslib::data::month_totals;
//!
//! let jan = month_totals(&cfg, "www.example.com", 2024, 1, Some(0), None);
//! println!("Pages in January: {}", jan.pages);
//! ```

pub mod aggregate;
pub mod block;
pub mod rows;
pub mod stats;

pub use aggregate::{
    data_file_name, month_data, month_totals, not_found_data, page_data, resolve_file, year_data,
};
pub use block::{block_lines, Block};
pub use rows::{general_value, DayRow, NotFoundRow, PageRow, TimeRow};
pub use stats::{DayTotals, PeriodAggregate};
