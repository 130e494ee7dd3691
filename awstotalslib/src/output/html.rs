//! HTML rendering of the totals report.
//!
//! The page is a single self-contained document: inline stylesheet, a
//! period selection form and the results table. Column headers link back
//! to the page with a different `sort` parameter.
//!
//! Language file text is inserted as-is (AWStats language files may carry
//! HTML entities); every other dynamic value is escaped.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::ReportConfig;
use crate::data::stats::PeriodAggregate;
use crate::query::options::{Month, NotViewedMode, RequestParams, SortColumn};
use crate::query::report::Report;
use crate::Result;

use super::format::NumberFormat;
use super::lang::{msg, Labels};

const STYLE: &str = "
body { font: 11px verdana, arial, helvetica, sans-serif; background-color: #ffffff; margin: 12px; }
form { margin-bottom: 12px; }
table.totals { border-collapse: collapse; border: 2px solid #ccccdd; }
table.totals th { background-color: #ecece8; padding: 2px 6px; text-align: center; }
table.totals th.site, table.totals td.site { text-align: left; }
table.totals td { padding: 2px 6px; text-align: right; border-top: 1px solid #e0e0e0; }
table.totals tr.total th { border-top: 2px solid #ccccdd; text-align: right; }
table.totals th.sorted { background-color: #c1b2e2; }
a { color: #0011bb; text-decoration: none; }
a:hover { color: #605040; text-decoration: underline; }
p.error { color: #cc0000; font-weight: bold; }
";

/// Percent-encode everything but RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Inputs of a page render beyond the report itself.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub cfg: &'a ReportConfig,
    pub labels: &'a Labels,
    pub params: RequestParams,
    /// Years offered by the period form
    pub years: &'a [i32],
}

/// Escape HTML special characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Link to the AWStats page of one site for the report period.
fn site_href(cfg: &ReportConfig, site: &str, params: &RequestParams) -> String {
    format!(
        "{}?config={}&year={}&month={}",
        cfg.awstats_url,
        utf8_percent_encode(site, QUERY_VALUE),
        params.period.year,
        params.period.month.param()
    )
}

/// Link to this page sorted by `column`.
fn sort_href(params: &RequestParams, column: SortColumn) -> String {
    let params = RequestParams {
        sort: column,
        ..*params
    };
    format!("?{}", params.to_query())
}

/// Value columns shown for a display mode, with their header message.
fn value_columns(mode: NotViewedMode) -> Vec<(SortColumn, u32)> {
    let mut columns = vec![
        (SortColumn::Visits, msg::VISITS),
        (SortColumn::Unique, msg::UNIQUE),
        (SortColumn::Pages, msg::PAGES),
        (SortColumn::Hits, msg::HITS),
        (SortColumn::Bandwidth, msg::BANDWIDTH),
    ];
    if mode == NotViewedMode::Columns {
        columns.extend([
            (SortColumn::NotViewedPages, msg::PAGES),
            (SortColumn::NotViewedHits, msg::HITS),
            (SortColumn::NotViewedBandwidth, msg::BANDWIDTH),
        ]);
    }
    columns
}

fn format_value(agg: &PeriodAggregate, column: SortColumn, fmt: &NumberFormat) -> String {
    match column {
        SortColumn::Bandwidth | SortColumn::NotViewedBandwidth => {
            fmt.byte_format(agg.sort_key(column), 2)
        }
        // unknown visits/unique render as 0
        _ => fmt.num_format(agg.sort_key(column) as f64, 0),
    }
}

fn header_cell(
    html: &mut String,
    params: &RequestParams,
    column: SortColumn,
    label: &str,
    extra: &str,
) {
    let mut classes = Vec::new();
    if column == SortColumn::Config {
        classes.push("site");
    }
    if params.sort == column {
        classes.push("sorted");
    }
    html.push_str("<th");
    if !classes.is_empty() {
        html.push_str(&format!(" class=\"{}\"", classes.join(" ")));
    }
    html.push_str(extra);
    html.push_str(&format!(
        "><a href=\"{}\">{}</a></th>",
        escape_html(&sort_href(params, column)),
        label
    ));
}

/// Render the results table for a report.
pub fn render_table(
    cfg: &ReportConfig,
    labels: &Labels,
    params: &RequestParams,
    report: &Report,
) -> String {
    let fmt = NumberFormat::from_config(cfg);
    let columns = value_columns(report.not_viewed);
    let mut html = String::with_capacity(1024 + report.rows.len() * 256);

    html.push_str("<table class=\"totals\">\n");

    if report.not_viewed == NotViewedMode::Columns {
        html.push_str("<tr>");
        header_cell(
            &mut html,
            params,
            SortColumn::Config,
            labels.get(msg::STATISTICS_FOR),
            " rowspan=\"2\"",
        );
        for (column, label) in &columns[..2] {
            header_cell(&mut html, params, *column, labels.get(*label), " rowspan=\"2\"");
        }
        html.push_str(&format!(
            "<th colspan=\"3\">{}</th><th colspan=\"3\">{}</th></tr>\n<tr>",
            labels.get(msg::VIEWED),
            labels.get(msg::NOT_VIEWED)
        ));
        for (column, label) in &columns[2..] {
            header_cell(&mut html, params, *column, labels.get(*label), "");
        }
        html.push_str("</tr>\n");
    } else {
        html.push_str("<tr>");
        header_cell(
            &mut html,
            params,
            SortColumn::Config,
            labels.get(msg::STATISTICS_FOR),
            "",
        );
        for (column, label) in &columns {
            header_cell(&mut html, params, *column, labels.get(*label), "");
        }
        html.push_str("</tr>\n");
    }

    for row in &report.rows {
        html.push_str(&format!(
            "<tr><td class=\"site\"><a href=\"{}\">{}</a></td>",
            escape_html(&site_href(cfg, &row.config, params)),
            escape_html(&row.config)
        ));
        for (column, _) in &columns {
            html.push_str(&format!("<td>{}</td>", format_value(row, *column, &fmt)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str(&format!(
        "<tr class=\"total\"><th class=\"site\">{}</th>",
        labels.get(msg::TOTAL)
    ));
    for (column, _) in &columns {
        html.push_str(&format!(
            "<th>{}</th>",
            format_value(&report.totals, *column, &fmt)
        ));
    }
    html.push_str("</tr>\n</table>\n");

    html
}

/// Render the period selection form.
pub fn render_form(labels: &Labels, params: &RequestParams, years: &[i32]) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<form action=\"\" method=\"get\">\n");
    html.push_str(&format!(
        "<b>{}:</b>\n<select name=\"month\">\n",
        labels.get(msg::REPORTED_PERIOD)
    ));

    let selected = |yes: bool| if yes { " selected" } else { "" };

    html.push_str(&format!(
        "<option value=\"all\"{}>-</option>\n",
        selected(params.period.month == Month::All)
    ));
    for month in 1..=12 {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            month,
            selected(params.period.month == Month::Number(month)),
            labels.month_name(month)
        ));
    }
    html.push_str("</select>\n<select name=\"year\">\n");

    let mut options: Vec<i32> = years.to_vec();
    if !options.contains(&params.period.year) {
        options.push(params.period.year);
    }
    options.sort_unstable();
    for year in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            year,
            selected(year == params.period.year),
            year
        ));
    }
    html.push_str("</select>\n");

    html.push_str(&format!(
        "<input type=\"hidden\" name=\"sort\" value=\"{}\">\n",
        params.sort.as_str()
    ));
    html.push_str(&format!(
        "<input type=\"submit\" value=\"{}\">\n</form>\n",
        labels.get(msg::OK)
    ));

    html
}

/// Render the complete HTML document.
///
/// A failed report (missing data directory) is shown as an error message
/// in place of the table.
pub fn render_page(ctx: &PageContext<'_>, report: &Result<Report>) -> String {
    let mut html = String::with_capacity(8192);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html lang=\"{}\">\n<head>\n",
        escape_html(&ctx.cfg.lang)
    ));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>AWStats Totals</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");

    html.push_str(&render_form(ctx.labels, &ctx.params, ctx.years));

    match report {
        Ok(report) => html.push_str(&render_table(ctx.cfg, ctx.labels, &ctx.params, report)),
        Err(e) => html.push_str(&format!(
            "<p class=\"error\">{}</p>\n",
            escape_html(&e.to_string())
        )),
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AwstotalsError;
    use crate::query::options::Period;

    fn agg(config: &str, pages: u64, not_viewed_pages: u64) -> PeriodAggregate {
        PeriodAggregate {
            config: config.to_string(),
            visits: Some(1234),
            unique: Some(56),
            pages,
            hits: pages * 2,
            bandwidth: 1536,
            not_viewed_pages,
            not_viewed_hits: 0,
            not_viewed_bandwidth: 0,
        }
    }

    fn report(mode: NotViewedMode) -> Report {
        let mut report = Report::empty(Period::year(2024), SortColumn::Pages, mode);
        report.rows = vec![agg("alpha", 5, 3), agg("b<e>ta", 2, 0)];
        report.totals = agg("", 7, 3);
        report
    }

    fn params() -> RequestParams {
        RequestParams {
            period: Period::year(2024),
            sort: SortColumn::Pages,
        }
    }

    fn first_row_cells(table: &str) -> usize {
        let row = table
            .lines()
            .find(|l| l.starts_with("<tr><td"))
            .unwrap();
        row.matches("<td").count()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }

    #[test]
    fn test_table_columns_per_mode() {
        let cfg = ReportConfig::new();
        let labels = Labels::english();

        let table = render_table(&cfg, &labels, &params(), &report(NotViewedMode::Sum));
        assert_eq!(first_row_cells(&table), 6);
        assert!(!table.contains("Not viewed traffic"));

        let table = render_table(&cfg, &labels, &params(), &report(NotViewedMode::Ignore));
        assert_eq!(first_row_cells(&table), 6);

        let table = render_table(&cfg, &labels, &params(), &report(NotViewedMode::Columns));
        assert_eq!(first_row_cells(&table), 9);
        assert!(table.contains("<th colspan=\"3\">Viewed traffic</th>"));
        assert!(table.contains("<th colspan=\"3\">Not viewed traffic</th>"));
        assert!(table.contains("rowspan=\"2\""));
    }

    #[test]
    fn test_table_sort_links_and_marker() {
        let cfg = ReportConfig::new();
        let table = render_table(&cfg, &Labels::english(), &params(), &report(NotViewedMode::Sum));

        assert!(table.contains("href=\"?year=2024&amp;month=all&amp;sort=bandwidth\""));
        assert!(table.contains("href=\"?year=2024&amp;month=all&amp;sort=config\""));
        assert!(table.contains(
            "<th class=\"sorted\"><a href=\"?year=2024&amp;month=all&amp;sort=pages\">Pages</a></th>"
        ));
    }

    #[test]
    fn test_table_values_formatted_and_escaped() {
        let cfg = ReportConfig::new().with_awstats_url("/awstats/awstats.pl");
        let table = render_table(&cfg, &Labels::english(), &params(), &report(NotViewedMode::Sum));

        assert!(table.contains("<td>1 234</td>"));
        assert!(table.contains("<td>1.5 KB</td>"));
        assert!(table.contains(
            "<a href=\"/awstats/awstats.pl?config=alpha&amp;year=2024&amp;month=all\">alpha</a>"
        ));
        assert!(table.contains(">b&lt;e&gt;ta</a>"));
        assert!(table.contains("config=b%3Ce%3Eta"));
        assert!(table.contains("<tr class=\"total\"><th class=\"site\">Total</th>"));
    }

    #[test]
    fn test_empty_report_renders_totals_row() {
        let cfg = ReportConfig::new();
        let empty = Report::empty(Period::year(2024), SortColumn::Bandwidth, NotViewedMode::Sum);
        let table = render_table(&cfg, &Labels::english(), &params(), &empty);

        assert!(!table.contains("<tr><td"));
        assert!(table.contains("<th>0 Bytes</th>"));
    }

    #[test]
    fn test_form_selection() {
        let params = RequestParams {
            period: Period::new(2023, Month::Number(2)),
            sort: SortColumn::Hits,
        };
        let form = render_form(&Labels::english(), &params, &[2021, 2022]);

        assert!(form.contains("<option value=\"2\" selected>Feb</option>"));
        assert!(form.contains("<option value=\"all\">-</option>"));
        assert!(form.contains("<option value=\"2023\" selected>2023</option>"));
        assert!(form.contains("<option value=\"2021\">2021</option>"));
        assert!(form.contains("name=\"sort\" value=\"hits\""));
    }

    #[test]
    fn test_page_with_error() {
        let cfg = ReportConfig::new();
        let labels = Labels::english();
        let ctx = PageContext {
            cfg: &cfg,
            labels: &labels,
            params: params(),
            years: &[],
        };
        let page = render_page(
            &ctx,
            &Err(AwstotalsError::DataDirNotFound("/missing".into())),
        );

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<p class=\"error\">AWStats data directory not found: /missing</p>"));
        assert!(!page.contains("<table class=\"totals\">"));
        assert!(page.ends_with("</html>\n"));
    }

    #[test]
    fn test_page_with_report() {
        let cfg = ReportConfig::new();
        let labels = Labels::english();
        let ctx = PageContext {
            cfg: &cfg,
            labels: &labels,
            params: params(),
            years: &[2024],
        };
        let page = render_page(&ctx, &Ok(report(NotViewedMode::Sum)));

        assert!(page.contains("<style>"));
        assert!(page.contains("<form action=\"\" method=\"get\">"));
        assert!(page.contains("<table class=\"totals\">"));
    }
}
