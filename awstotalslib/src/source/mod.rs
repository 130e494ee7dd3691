//! Source discovery: find AWStats data files to read.
//!
//! This module handles the first stage of the pipeline - discovering which
//! database files exist and which site configs take part. It provides:
//!
//! - **Scanning**: recursive listing of the data directory
//! - **Site filtering**: allow/deny lists of config names
//!
//! ## Example
//!
//! ```rust,ignore
//! use awstotalslib::source::{list_files, SiteFilter};
//!
//! let files = list_files("/var/lib/awstats");
//! let filter = SiteFilter::new().deny("staging.*")?;
//! ```

pub mod filter;
pub mod scan;

pub use filter::SiteFilter;
pub use scan::{find_file, list_files};
