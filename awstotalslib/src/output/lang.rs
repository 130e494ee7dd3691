//! Display labels from AWStats language files.
//!
//! AWStats ships `awstats-<lang>.txt` files with `message<N>=<text>` lines.
//! The report uses a handful of those messages; English built-ins cover
//! every one of them so a missing or partial file still renders.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::ReportConfig;

/// AWStats message numbers used by the report.
pub mod msg {
    pub const MONTH: u32 = 5;
    pub const YEAR: u32 = 6;
    pub const STATISTICS_FOR: u32 = 7;
    pub const VISITS: u32 = 10;
    pub const UNIQUE: u32 = 11;
    pub const PAGES: u32 = 56;
    pub const HITS: u32 = 57;
    /// January; December is `JANUARY + 11`
    pub const JANUARY: u32 = 60;
    pub const BANDWIDTH: u32 = 75;
    pub const TOTAL: u32 = 102;
    pub const OK: u32 = 115;
    pub const REPORTED_PERIOD: u32 = 133;
    pub const VIEWED: u32 = 160;
    pub const NOT_VIEWED: u32 = 161;
}

const ENGLISH: &[(u32, &str)] = &[
    (msg::MONTH, "Month"),
    (msg::YEAR, "Year"),
    (msg::STATISTICS_FOR, "Statistics for"),
    (msg::VISITS, "Number of visits"),
    (msg::UNIQUE, "Unique visitors"),
    (msg::PAGES, "Pages"),
    (msg::HITS, "Hits"),
    (60, "Jan"),
    (61, "Feb"),
    (62, "Mar"),
    (63, "Apr"),
    (64, "May"),
    (65, "Jun"),
    (66, "Jul"),
    (67, "Aug"),
    (68, "Sep"),
    (69, "Oct"),
    (70, "Nov"),
    (71, "Dec"),
    (msg::BANDWIDTH, "Bandwidth"),
    (msg::TOTAL, "Total"),
    (msg::OK, "OK"),
    (msg::REPORTED_PERIOD, "Reported period"),
    (msg::VIEWED, "Viewed traffic"),
    (msg::NOT_VIEWED, "Not viewed traffic"),
];

/// Message table for one language.
#[derive(Debug, Clone)]
pub struct Labels {
    messages: HashMap<u32, String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

impl Labels {
    /// Built-in English labels.
    pub fn english() -> Self {
        Self {
            messages: ENGLISH
                .iter()
                .map(|(id, text)| (*id, text.to_string()))
                .collect(),
        }
    }

    /// English labels overlaid with the configured language file, if any.
    pub fn load(cfg: &ReportConfig) -> Self {
        let mut labels = Self::english();
        let path = cfg.lang_file();
        match read_messages(&path) {
            Some(messages) => {
                debug!(path = %path.display(), count = messages.len(), "loaded language file");
                labels.messages.extend(messages);
            }
            None => {
                if cfg.lang != "en" {
                    warn!(path = %path.display(), "language file not found, using English");
                }
            }
        }
        labels
    }

    /// Overlay messages parsed from language file text.
    pub fn with_text(mut self, content: &str) -> Self {
        self.messages.extend(parse_messages(content));
        self
    }

    /// Text of message `id`, or an empty string if unknown.
    pub fn get(&self, id: u32) -> &str {
        self.messages.get(&id).map(|s| s.as_str()).unwrap_or("")
    }

    /// Short month name, `month` in 1..=12.
    pub fn month_name(&self, month: u32) -> &str {
        self.get(msg::JANUARY + month.saturating_sub(1))
    }
}

fn read_messages(path: &Path) -> Option<HashMap<u32, String>> {
    let bytes = std::fs::read(path).ok()?;
    Some(parse_messages(&String::from_utf8_lossy(&bytes)))
}

static MESSAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^message(\d+)=(.*)$").expect("language message regex"));

/// Parse `message<N>=<text>` lines; everything else is ignored.
pub fn parse_messages(content: &str) -> HashMap<u32, String> {
    content
        .lines()
        .filter_map(|line| {
            let caps = MESSAGE_RE.captures(line.trim_end())?;
            let id = caps[1].parse().ok()?;
            Some((id, caps[2].to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_english_defaults() {
        let labels = Labels::english();
        assert_eq!(labels.get(msg::VISITS), "Number of visits");
        assert_eq!(labels.get(msg::BANDWIDTH), "Bandwidth");
        assert_eq!(labels.month_name(1), "Jan");
        assert_eq!(labels.month_name(12), "Dec");
        assert_eq!(labels.get(9999), "");
    }

    #[test]
    fn test_parse_messages() {
        let messages = parse_messages(
            "# comment\nmessage10=Aantal bezoeken\r\nmessage56=Pagina's\nPageCode=utf-8\nmessageX=bad\n",
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[&10], "Aantal bezoeken");
        assert_eq!(messages[&56], "Pagina's");
    }

    #[test]
    fn test_parse_messages_repeated_calls() {
        for _ in 0..3 {
            let messages = parse_messages("message7=Statistics for <b>a=b</b>\n");
            assert_eq!(messages[&7], "Statistics for <b>a=b</b>");
        }
        assert!(parse_messages("").is_empty());
    }

    #[test]
    fn test_overlay_keeps_missing_english() {
        let labels = Labels::english().with_text("message10=Visites\n");
        assert_eq!(labels.get(msg::VISITS), "Visites");
        assert_eq!(labels.get(msg::HITS), "Hits");
    }

    #[test]
    fn test_load_language_file() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("awstats-nl.txt"),
            "message57=Hits (nl)\nmessage60=jan\n",
        )
        .unwrap();
        let cfg = ReportConfig::new().with_lang_dir(temp.path()).with_lang("nl");

        let labels = Labels::load(&cfg);
        assert_eq!(labels.get(msg::HITS), "Hits (nl)");
        assert_eq!(labels.month_name(1), "jan");
        assert_eq!(labels.get(msg::PAGES), "Pages");
    }

    #[test]
    fn test_load_missing_language_file_falls_back() {
        let cfg = ReportConfig::new()
            .with_lang_dir("/nonexistent/lang")
            .with_lang("fr");
        let labels = Labels::load(&cfg);
        assert_eq!(labels.get(msg::TOTAL), "Total");
    }
}
