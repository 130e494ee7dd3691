//! Per-site, per-period aggregation of AWStats database files.
//!
//! These are the entry points for reading one site's figures:
//! month totals, a year broken down by month, a month broken down by day,
//! and the per-page and 404 listings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::ReportConfig;
use crate::source::scan::find_file;

use super::block::{block_lines, Block};
use super::rows::{general_value, DayRow, NotFoundRow, PageRow, TimeRow};
use super::stats::{DayTotals, PeriodAggregate};

/// File name AWStats uses for one site and month: `awstats<MM><YYYY>.<site>.txt`.
pub fn data_file_name(site: &str, year: i32, month: u32) -> String {
    format!("awstats{:02}{:04}.{}.txt", month, year, site)
}

/// Locate the database file of `site` for a month.
///
/// Looks directly in the data directory first, then anywhere below it.
pub fn resolve_file(cfg: &ReportConfig, site: &str, year: i32, month: u32) -> Option<PathBuf> {
    let name = data_file_name(site, year, month);
    let direct = cfg.data_dir.join(&name);
    if direct.is_file() {
        return Some(direct);
    }
    find_file(&cfg.data_dir, &name)
}

/// Summary figures of `site` for one month.
///
/// `default` is used for visits and unique visitors when the file or the
/// GENERAL keys are missing. Pages, hits and bandwidth are column sums of
/// the TIME section and are 0 without a file. When `known_file` is given
/// the file is not looked up again.
pub fn month_totals(
    cfg: &ReportConfig,
    site: &str,
    year: i32,
    month: u32,
    default: Option<u64>,
    known_file: Option<&Path>,
) -> PeriodAggregate {
    let mut agg = PeriodAggregate::new(site, default);

    let file = match known_file {
        Some(path) => Some(path.to_path_buf()),
        None => resolve_file(cfg, site, year, month),
    };
    let Some(file) = file else {
        debug!(site, year, month, "no data file");
        return agg;
    };

    let general = block_lines(Block::General.as_str(), &file);
    if let Some(visits) = general_value(&general, "TotalVisits") {
        agg.visits = Some(visits);
    }
    if let Some(unique) = general_value(&general, "TotalUnique") {
        agg.unique = Some(unique);
    }

    for line in block_lines(Block::Time.as_str(), &file) {
        let row = TimeRow::parse(&line);
        agg.pages = agg.pages.saturating_add(row.pages);
        agg.hits = agg.hits.saturating_add(row.hits);
        agg.bandwidth = agg.bandwidth.saturating_add(row.bandwidth);
        agg.not_viewed_pages = agg.not_viewed_pages.saturating_add(row.not_viewed_pages);
        agg.not_viewed_hits = agg.not_viewed_hits.saturating_add(row.not_viewed_hits);
        agg.not_viewed_bandwidth = agg.not_viewed_bandwidth.saturating_add(row.not_viewed_bandwidth);
    }

    debug!(site, file = %file.display(), pages = agg.pages, "aggregated data file");
    agg
}

/// Month-by-month figures of `site` for a year, keyed by the first day
/// of each month. Months without data have unknown visits/unique.
pub fn year_data(cfg: &ReportConfig, site: &str, year: i32) -> BTreeMap<NaiveDate, PeriodAggregate> {
    (1..=12)
        .filter_map(|month| {
            let date = NaiveDate::from_ymd_opt(year, month, 1)?;
            Some((date, month_totals(cfg, site, year, month, None, None)))
        })
        .collect()
}

/// Convert an AWStats `yyyymmdd` stamp to a date.
fn parse_day(stamp: &str) -> Option<NaiveDate> {
    if stamp.len() != 8 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = stamp[0..4].parse().ok()?;
    let month = stamp[4..6].parse().ok()?;
    let day = stamp[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Day-by-day figures of `site` for one month.
///
/// With `complete_month`, every calendar day is present (unknown values
/// for days AWStats has no row for). Otherwise only recorded days appear.
pub fn month_data(
    cfg: &ReportConfig,
    site: &str,
    year: i32,
    month: u32,
    complete_month: bool,
) -> BTreeMap<NaiveDate, DayTotals> {
    let mut days = BTreeMap::new();

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return days;
    };

    if complete_month {
        for date in first.iter_days().take_while(|d| d.month() == month) {
            days.insert(date, DayTotals::default());
        }
    }

    let file = resolve_file(cfg, site, year, month).unwrap_or_default();
    for line in block_lines(Block::Day.as_str(), &file) {
        let row = DayRow::parse(&line);
        let Some(date) = parse_day(&row.date) else {
            debug!(site, row = %line, "skipping DAY row with bad date");
            continue;
        };
        days.insert(
            date,
            DayTotals {
                pages: Some(row.pages),
                hits: Some(row.hits),
                bandwidth: Some(row.bandwidth),
                visits: Some(row.visits),
            },
        );
    }

    days
}

/// Per-page figures of `site` for one month, most viewed first.
pub fn page_data(cfg: &ReportConfig, site: &str, year: i32, month: u32) -> Vec<PageRow> {
    let file = resolve_file(cfg, site, year, month).unwrap_or_default();
    let mut rows: Vec<PageRow> = block_lines(Block::Sider.as_str(), &file)
        .iter()
        .map(|line| PageRow::parse(line))
        .collect();
    rows.sort_by(|a, b| b.pages.cmp(&a.pages));
    rows
}

/// URLs answered with 404 for `site` in one month, most hit first.
pub fn not_found_data(cfg: &ReportConfig, site: &str, year: i32, month: u32) -> Vec<NotFoundRow> {
    let file = resolve_file(cfg, site, year, month).unwrap_or_default();
    let mut rows: Vec<NotFoundRow> = block_lines(Block::Sider404.as_str(), &file)
        .iter()
        .map(|line| NotFoundRow::parse(line))
        .collect();
    rows.sort_by(|a, b| b.hits.cmp(&a.hits));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const JAN_2024: &str = "\
AWSTATS DATA FILE 7.9
BEGIN_GENERAL 3
LastLine 20240131235959 1 2 3
TotalVisits 120
TotalUnique 45
END_GENERAL
BEGIN_TIME 3
0 10 20 1000 1 2 50
1 5 15 500 0 1 10
2 0 0 0 3 4 40
END_TIME
BEGIN_DAY 2
20240101 7 14 700 3
20240115 8 21 800 5
END_DAY
BEGIN_SIDER 3
/a.html 3 300 1 0
/b.html 9 900 2 2
/c.html 5 500 0 1
END_SIDER
BEGIN_SIDER_404 2
/old 2 -
/gone 7 http://ref.example/
END_SIDER_404
";

    fn data_dir() -> (TempDir, ReportConfig) {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("awstats012024.alpha.txt"), JAN_2024).unwrap();
        let cfg = ReportConfig::new().with_data_dir(temp.path());
        (temp, cfg)
    }

    #[test]
    fn test_data_file_name() {
        assert_eq!(
            data_file_name("www.example.com", 2024, 3),
            "awstats032024.www.example.com.txt"
        );
    }

    #[test]
    fn test_resolve_file_direct_and_nested() {
        let (temp, cfg) = data_dir();
        fs::create_dir_all(temp.path().join("beta")).unwrap();
        fs::write(temp.path().join("beta/awstats022024.beta.txt"), "").unwrap();

        let direct = resolve_file(&cfg, "alpha", 2024, 1).unwrap();
        assert!(direct.ends_with("awstats012024.alpha.txt"));

        let nested = resolve_file(&cfg, "beta", 2024, 2).unwrap();
        assert!(nested.ends_with("beta/awstats022024.beta.txt"));

        assert!(resolve_file(&cfg, "alpha", 2023, 1).is_none());
    }

    #[test]
    fn test_month_totals() {
        let (_temp, cfg) = data_dir();
        let agg = month_totals(&cfg, "alpha", 2024, 1, Some(0), None);

        assert_eq!(agg.config, "alpha");
        assert_eq!(agg.visits, Some(120));
        assert_eq!(agg.unique, Some(45));
        assert_eq!(agg.pages, 15);
        assert_eq!(agg.hits, 35);
        assert_eq!(agg.bandwidth, 1500);
        assert_eq!(agg.not_viewed_pages, 4);
        assert_eq!(agg.not_viewed_hits, 7);
        assert_eq!(agg.not_viewed_bandwidth, 100);
    }

    #[test]
    fn test_month_totals_saturates_huge_rows() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("awstats012024.site.txt"),
            "BEGIN_TIME 2\n0 18446744073709551615 1 1 0 0 0\n1 1 1 1 0 0 0\nEND_TIME\n",
        )
        .unwrap();
        let cfg = ReportConfig::new().with_data_dir(temp.path());

        let agg = month_totals(&cfg, "site", 2024, 1, Some(0), None);
        assert_eq!(agg.pages, u64::MAX);
        assert_eq!(agg.hits, 2);
    }

    #[test]
    fn test_month_totals_missing_file_uses_default() {
        let (_temp, cfg) = data_dir();

        let agg = month_totals(&cfg, "alpha", 2024, 2, Some(0), None);
        assert_eq!(agg, PeriodAggregate::new("alpha", Some(0)));

        let agg = month_totals(&cfg, "nobody", 2024, 1, None, None);
        assert_eq!(agg.visits, None);
        assert_eq!(agg.unique, None);
        assert_eq!(agg.pages, 0);
        assert_eq!(agg.hits, 0);
        assert_eq!(agg.bandwidth, 0);
        assert_eq!(agg.not_viewed_bandwidth, 0);
    }

    #[test]
    fn test_month_totals_known_file() {
        let (temp, cfg) = data_dir();
        let other = temp.path().join("elsewhere.txt");
        fs::write(&other, "BEGIN_TIME 1\n0 4 4 4 0 0 0\nEND_TIME\n").unwrap();

        let agg = month_totals(&cfg, "alpha", 2024, 1, Some(0), Some(&other));
        assert_eq!(agg.pages, 4);
        // no GENERAL section in the known file
        assert_eq!(agg.visits, Some(0));
    }

    #[test]
    fn test_year_data() {
        let (_temp, cfg) = data_dir();
        let year = year_data(&cfg, "alpha", 2024);

        assert_eq!(year.len(), 12);
        let jan = &year[&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()];
        assert_eq!(jan.visits, Some(120));
        let feb = &year[&NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()];
        assert_eq!(feb.visits, None);
        assert_eq!(feb.pages, 0);

        let keys: Vec<String> = year.keys().map(|d| d.to_string()).collect();
        assert_eq!(keys[0], "2024-01-01");
        assert_eq!(keys[11], "2024-12-01");
    }

    #[test]
    fn test_month_data_complete() {
        let (_temp, cfg) = data_dir();
        let days = month_data(&cfg, "alpha", 2024, 1, true);

        assert_eq!(days.len(), 31);
        let first = days[&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()];
        assert_eq!(first.pages, Some(7));
        assert_eq!(first.visits, Some(3));
        let second = days[&NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
        assert_eq!(second, DayTotals::default());
    }

    #[test]
    fn test_month_data_sparse() {
        let (_temp, cfg) = data_dir();
        let days = month_data(&cfg, "alpha", 2024, 1, false);

        let keys: Vec<String> = days.keys().map(|d| d.to_string()).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-15"]);
    }

    #[test]
    fn test_month_data_leap_years() {
        let (_temp, cfg) = data_dir();
        assert_eq!(month_data(&cfg, "alpha", 2024, 2, true).len(), 29);
        assert_eq!(month_data(&cfg, "alpha", 2023, 2, true).len(), 28);
        assert_eq!(month_data(&cfg, "alpha", 1900, 2, true).len(), 28);
        assert_eq!(month_data(&cfg, "alpha", 2000, 2, true).len(), 29);
        assert!(month_data(&cfg, "alpha", 2024, 13, true).is_empty());
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("20240229"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_day("20230229"), None);
        assert_eq!(parse_day("2024022"), None);
        assert_eq!(parse_day("2024-2-1"), None);
    }

    #[test]
    fn test_page_data_sorted() {
        let (_temp, cfg) = data_dir();
        let pages = page_data(&cfg, "alpha", 2024, 1);

        let urls: Vec<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/b.html", "/c.html", "/a.html"]);
        assert_eq!(pages[0].entry, 2);
    }

    #[test]
    fn test_not_found_data_sorted() {
        let (_temp, cfg) = data_dir();
        let rows = not_found_data(&cfg, "alpha", 2024, 1);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].url, "/gone");
        assert_eq!(rows[0].referer, "http://ref.example/");
        assert_eq!(rows[1].hits, 2);

        assert!(not_found_data(&cfg, "alpha", 2024, 6).is_empty());
    }
}
