//! # awstotals
//!
//! A CLI for reporting totals over many AWStats sites.
//!
//! ## Overview
//!
//! awstotals is built on top of awstotalslib. It reads the AWStats data
//! directory, sums every site's figures for a year or month, and prints an
//! HTML page with a sortable table. The same data is available as JSON,
//! together with per-site breakdowns by month, day, page and 404 URL.
//!
//! ## Usage
//!
//! ```bash
//! # HTML totals for the current year
//! awstotals --data-dir /var/lib/awstats
//!
//! # March 2024, sorted by visits, as JSON
//! awstotals report --year 2024 --month 3 --sort visits --json
//!
//! # As a CGI program (parameters from QUERY_STRING)
//! awstotals report --cgi
//!
//! # One site, month by month / day by day
//! awstotals year --site www.example.com --year 2024
//! awstotals month --site www.example.com --year 2024 --month 2
//! ```

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use awstotalslib::output::Labels;
use awstotalslib::{
    available_years, build_report, current_year, month_data, not_found_data, page_data,
    render_page, year_data, Month, NotViewedMode, PageContext, ReportConfig, RequestParams,
    SortColumn,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use tracing::debug;

const SORT_NAMES: [&str; 9] = [
    "config",
    "visits",
    "unique",
    "pages",
    "hits",
    "bandwidth",
    "not_viewed_pages",
    "not_viewed_hits",
    "not_viewed_bandwidth",
];

/// Arguments selecting and presenting the totals report
fn report_args() -> Vec<Arg> {
    vec![
        Arg::new("year")
            .short('y')
            .long("year")
            .value_parser(value_parser!(i32).range(1000..=9999))
            .help("Year to report (defaults to the current year)"),
        Arg::new("month")
            .short('m')
            .long("month")
            .help("Month to report, 1-12 or 'all' (default: all)"),
        Arg::new("sort")
            .short('s')
            .long("sort")
            .value_parser(SORT_NAMES)
            .help("Column to sort by"),
        Arg::new("query")
            .short('q')
            .long("query")
            .env("QUERY_STRING")
            .hide_env_values(true)
            .help("Request query string (year=..&month=..&sort=..)"),
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print the report as JSON instead of HTML"),
        Arg::new("cgi")
            .long("cgi")
            .action(ArgAction::SetTrue)
            .help("Prefix the HTML with a CGI Content-Type header"),
    ]
}

/// Arguments selecting one site and year
fn site_args() -> Vec<Arg> {
    vec![
        Arg::new("site")
            .long("site")
            .required(true)
            .help("Site config name (as in awstats<MM><YYYY>.<site>.txt)"),
        Arg::new("year")
            .short('y')
            .long("year")
            .value_parser(value_parser!(i32).range(1000..=9999))
            .help("Year (defaults to the current year)"),
    ]
}

fn month_arg() -> Arg {
    Arg::new("month")
        .short('m')
        .long("month")
        .required(true)
        .value_parser(value_parser!(u32).range(1..=12))
        .help("Month, 1-12")
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("awstotals")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Totals over AWStats data files for many sites")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML settings file"),
        )
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("AWStats data directory (searched recursively)"),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .global(true)
                .help("Two-letter language code for labels"),
        )
        .arg(
            Arg::new("lang-dir")
                .long("lang-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory with awstats-<lang>.txt files"),
        )
        .arg(
            Arg::new("awstats-url")
                .long("awstats-url")
                .global(true)
                .help("AWStats CGI URL used for per-site links"),
        )
        .arg(
            Arg::new("not-viewed")
                .long("not-viewed")
                .global(true)
                .value_parser(["ignore", "columns", "sum"])
                .help("How to report not-viewed traffic"),
        )
        .arg(
            Arg::new("sort-default")
                .long("sort-default")
                .global(true)
                .value_parser(SORT_NAMES)
                .help("Sort column when none is requested"),
        )
        .arg(
            Arg::new("allow")
                .long("allow")
                .global(true)
                .action(ArgAction::Append)
                .help("Only include sites matching glob pattern (can be repeated)"),
        )
        .arg(
            Arg::new("deny")
                .long("deny")
                .global(true)
                .action(ArgAction::Append)
                .help("Exclude sites matching glob pattern (can be repeated)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug events to stderr"),
        )
        .args(report_args())
        .subcommand(
            Command::new("report")
                .about("Totals table for all sites (default command)")
                .args(report_args()),
        )
        .subcommand(
            Command::new("year")
                .about("One site's figures month by month (JSON)")
                .args(site_args()),
        )
        .subcommand(
            Command::new("month")
                .about("One site's figures day by day (JSON)")
                .args(site_args())
                .arg(month_arg())
                .arg(
                    Arg::new("sparse")
                        .long("sparse")
                        .action(ArgAction::SetTrue)
                        .help("Only list days AWStats recorded"),
                ),
        )
        .subcommand(
            Command::new("pages")
                .about("One site's per-page figures for a month (JSON)")
                .args(site_args())
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("not-found")
                .about("One site's 404 URLs for a month (JSON)")
                .args(site_args())
                .arg(month_arg()),
        )
}

/// Build settings: defaults, then the TOML file, then flags
fn build_config(matches: &ArgMatches) -> anyhow::Result<ReportConfig> {
    let mut cfg = match matches.get_one::<PathBuf>("config") {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::new(),
    };

    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        cfg = cfg.with_data_dir(dir);
    }
    if let Some(lang) = matches.get_one::<String>("lang") {
        cfg = cfg.with_lang(lang);
    }
    if let Some(dir) = matches.get_one::<PathBuf>("lang-dir") {
        cfg = cfg.with_lang_dir(dir);
    }
    if let Some(url) = matches.get_one::<String>("awstats-url") {
        cfg = cfg.with_awstats_url(url);
    }
    if let Some(mode) = matches.get_one::<String>("not-viewed") {
        cfg = cfg.with_not_viewed(mode.parse::<NotViewedMode>().map_err(anyhow::Error::msg)?);
    }
    if let Some(sort) = matches.get_one::<String>("sort-default") {
        cfg = cfg.with_sort_default(sort.parse::<SortColumn>().map_err(anyhow::Error::msg)?);
    }
    if let Some(patterns) = matches.get_many::<String>("allow") {
        cfg = cfg.allow(patterns.cloned());
    }
    if let Some(patterns) = matches.get_many::<String>("deny") {
        cfg = cfg.deny(patterns.cloned());
    }

    // Surface bad glob patterns before any work is done
    cfg.site_filter()?;

    debug!(data_dir = %cfg.data_dir.display(), "settings loaded");
    Ok(cfg)
}

/// Request parameters: the query string first, explicit flags override it
fn request_params(cfg: &ReportConfig, matches: &ArgMatches) -> RequestParams {
    let mut params = match matches.get_one::<String>("query") {
        Some(query) => RequestParams::from_query(query, cfg.sort_default),
        None => RequestParams::defaults(cfg.sort_default),
    };

    if let Some(year) = matches.get_one::<i32>("year") {
        params.period.year = *year;
    }
    if let Some(month) = matches.get_one::<String>("month") {
        params.period.month = Month::parse_param(month);
    }
    if let Some(sort) = matches.get_one::<String>("sort") {
        if let Some(sort) = SortColumn::parse_param(sort) {
            params.sort = sort;
        }
    }

    params
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handler for the report command
fn report_handler(cfg: &ReportConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let mut params = request_params(cfg, matches);
    let report = build_report(cfg, params.period, params.sort, cfg.not_viewed);
    if let Ok(report) = &report {
        params.sort = report.sort;
    }

    if matches.get_flag("json") {
        return print_json(&report?);
    }

    let years = available_years(cfg).unwrap_or_default();
    let labels = Labels::load(cfg);
    let ctx = PageContext {
        cfg,
        labels: &labels,
        params,
        years: &years,
    };

    if matches.get_flag("cgi") {
        print!("Content-Type: text/html; charset=utf-8\r\n\r\n");
    }
    print!("{}", render_page(&ctx, &report));
    Ok(())
}

fn site_and_year(matches: &ArgMatches) -> anyhow::Result<(String, i32)> {
    let site = matches
        .get_one::<String>("site")
        .context("--site is required")?
        .clone();
    let year = matches
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(current_year);
    Ok((site, year))
}

fn month_of(matches: &ArgMatches) -> anyhow::Result<u32> {
    matches
        .get_one::<u32>("month")
        .copied()
        .context("--month is required")
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let cfg = build_config(matches)?;

    match matches.subcommand() {
        Some(("report", sub)) => report_handler(&cfg, sub),
        Some(("year", sub)) => {
            let (site, year) = site_and_year(sub)?;
            print_json(&year_data(&cfg, &site, year))
        }
        Some(("month", sub)) => {
            let (site, year) = site_and_year(sub)?;
            let month = month_of(sub)?;
            let complete = !sub.get_flag("sparse");
            print_json(&month_data(&cfg, &site, year, month, complete))
        }
        Some(("pages", sub)) => {
            let (site, year) = site_and_year(sub)?;
            print_json(&page_data(&cfg, &site, year, month_of(sub)?))
        }
        Some(("not-found", sub)) => {
            let (site, year) = site_and_year(sub)?;
            print_json(&not_found_data(&cfg, &site, year, month_of(sub)?))
        }
        _ => report_handler(&cfg, matches),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    logging::init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
