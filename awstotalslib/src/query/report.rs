//! Multi-site report: every site's figures for one period, merged,
//! totalled and sorted.
//!
//! The data pipeline is:
//! 1. Matched files (site, month, path) from the data directory
//! 2. One `PeriodAggregate` per file
//! 3. Grouped by site (a year report has up to 12 files per site)
//! 4. Sorted rows plus grand totals

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ReportConfig;
use crate::data::aggregate::month_totals;
use crate::data::stats::PeriodAggregate;
use crate::error::AwstotalsError;
use crate::source::scan::list_files;
use crate::Result;

use super::options::{NotViewedMode, Period, SortColumn};

/// A database file whose name matched the requested period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedFile {
    /// Site config name taken from the file name
    pub site: String,
    pub year: i32,
    pub month: u32,
    pub path: PathBuf,
}

/// Report rows and totals for one period.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub period: Period,
    pub sort: SortColumn,
    pub not_viewed: NotViewedMode,
    /// One row per site, sorted
    pub rows: Vec<PeriodAggregate>,
    /// Sum over all rows (not-viewed only in `columns` mode)
    pub totals: PeriodAggregate,
    /// Number of database files read
    pub file_count: usize,
}

impl Report {
    /// An empty report with zero totals.
    pub fn empty(period: Period, sort: SortColumn, not_viewed: NotViewedMode) -> Self {
        Self {
            period,
            sort,
            not_viewed,
            rows: Vec::new(),
            totals: PeriodAggregate::new("", Some(0)),
            file_count: 0,
        }
    }
}

/// Regex for data file names of `period`; captures month, year and site.
fn file_name_pattern(period: &Period) -> Result<Regex> {
    let month = period
        .month
        .file_part()
        .unwrap_or_else(|| r"\d{2}".to_string());
    let pattern = format!(r"^awstats({})({:04})\.(.+)\.txt$", month, period.year);
    Ok(Regex::new(&pattern)?)
}

/// Find every data file of `period` for the sites allowed by the settings.
///
/// Files are returned in scan order.
pub fn configs_and_files(cfg: &ReportConfig, period: &Period) -> Result<Vec<MatchedFile>> {
    let pattern = file_name_pattern(period)?;
    let filter = cfg.site_filter()?;

    let matched = list_files(&cfg.data_dir)
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let caps = pattern.captures(name)?;
            let site = caps[3].to_string();
            if !filter.matches(&site) {
                debug!(site = %site, "site filtered out");
                return None;
            }
            let month = caps[1].parse().ok()?;
            let year = caps[2].parse().ok()?;
            Some(MatchedFile {
                site,
                year,
                month,
                path,
            })
        })
        .collect();

    Ok(matched)
}

/// Build the totals report for `period`.
///
/// Each matched file is aggregated on its own. In `Sum` mode not-viewed
/// traffic is folded into the viewed figures first. Files of the same site
/// are then summed into one row. Totals always include visits, unique,
/// pages, hits and bandwidth, and include not-viewed figures only in
/// `Columns` mode.
///
/// Rows are sorted by config name ascending for `SortColumn::Config` and
/// by the chosen column descending otherwise; ties keep config order.
/// A not-viewed column outside `Columns` mode is not shown, so the
/// configured default sort applies instead.
///
/// Fails only if the data directory does not exist.
pub fn build_report(
    cfg: &ReportConfig,
    period: Period,
    sort: SortColumn,
    mode: NotViewedMode,
) -> Result<Report> {
    if !cfg.data_dir.is_dir() {
        warn!(path = %cfg.data_dir.display(), "data directory not found");
        return Err(AwstotalsError::DataDirNotFound(cfg.data_dir.clone()));
    }

    let sort = shown_sort(sort, mode, cfg.sort_default);
    let matched = configs_and_files(cfg, &period)?;
    let mut report = Report::empty(period, sort, mode);
    report.file_count = matched.len();

    // BTreeMap keeps sites in ascending config order
    let mut grouped: BTreeMap<String, PeriodAggregate> = BTreeMap::new();

    for file in &matched {
        let mut agg = month_totals(
            cfg,
            &file.site,
            file.year,
            file.month,
            Some(0),
            Some(&file.path),
        );

        if mode == NotViewedMode::Sum {
            agg.fold_not_viewed();
        }

        report.totals.add_viewed(&agg);
        if mode == NotViewedMode::Columns {
            report.totals.add_not_viewed(&agg);
        }

        match grouped.entry(file.site.clone()) {
            Entry::Occupied(mut e) => *e.get_mut() += agg,
            Entry::Vacant(e) => {
                e.insert(agg);
            }
        }
    }

    report.rows = grouped.into_values().collect();
    sort_rows(&mut report.rows, sort);

    debug!(
        files = report.file_count,
        sites = report.rows.len(),
        "report built"
    );
    Ok(report)
}

/// `sort` if the table shows it in `mode`, else the first shown of
/// `default` and `SortColumn::Bandwidth`.
fn shown_sort(sort: SortColumn, mode: NotViewedMode, default: SortColumn) -> SortColumn {
    if sort.is_shown(mode) {
        return sort;
    }
    debug!(sort = %sort, mode = mode.as_str(), "sort column hidden, using default");
    if default.is_shown(mode) {
        default
    } else {
        SortColumn::default()
    }
}

/// Sort rows in place (stable).
fn sort_rows(rows: &mut [PeriodAggregate], sort: SortColumn) {
    match sort {
        SortColumn::Config => rows.sort_by(|a, b| a.config.cmp(&b.config)),
        column => rows.sort_by(|a, b| b.sort_key(column).cmp(&a.sort_key(column))),
    }
}

/// Years for which at least one allowed site has a data file, ascending.
pub fn available_years(cfg: &ReportConfig) -> Result<Vec<i32>> {
    let pattern = Regex::new(r"^awstats\d{2}(\d{4})\.(.+)\.txt$")?;
    let filter = cfg.site_filter()?;

    let years: BTreeSet<i32> = list_files(&cfg.data_dir)
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let caps = pattern.captures(name)?;
            if !filter.matches(&caps[2]) {
                return None;
            }
            caps[1].parse().ok()
        })
        .collect();

    Ok(years.into_iter().collect())
}
