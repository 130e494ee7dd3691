//! Report settings.
//!
//! A `ReportConfig` is built once (defaults, then an optional TOML file,
//! then command-line overrides) and passed by reference to every
//! operation. Nothing in the library keeps settings in global state.
//!
//! ```toml
//! data_dir = "/var/lib/awstats"
//! not_viewed = "columns"
//! sort_default = "visits"
//! thousands_sep = ","
//! deny = ["staging.*"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AwstotalsError;
use crate::query::options::{NotViewedMode, SortColumn};
use crate::source::filter::SiteFilter;
use crate::Result;

/// Settings shared by all requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory holding the AWStats database files (searched recursively)
    pub data_dir: PathBuf,
    /// Directory holding AWStats language files (`awstats-<lang>.txt`)
    pub lang_dir: PathBuf,
    /// Base URL of the AWStats CGI, used for per-site links
    pub awstats_url: String,
    /// Two-letter language code
    pub lang: String,
    /// How not-viewed traffic is reported
    pub not_viewed: NotViewedMode,
    /// Sort column when the request names none
    pub sort_default: SortColumn,
    /// Decimal point used by number formatting
    pub dec_point: String,
    /// Thousands separator used by number formatting
    pub thousands_sep: String,
    /// Config name patterns to include (empty = all)
    pub allow: Vec<String>,
    /// Config name patterns to exclude
    pub deny: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/awstats"),
            lang_dir: PathBuf::from("/usr/share/awstats/lang"),
            awstats_url: "/cgi-bin/awstats.pl".to_string(),
            lang: "en".to_string(),
            not_viewed: NotViewedMode::Sum,
            sort_default: SortColumn::Bandwidth,
            dec_point: ".".to_string(),
            thousands_sep: " ".to_string(),
            allow: Vec::new(),
            deny: Vec::new(),
        }
    }
}

impl ReportConfig {
    /// Create default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml(content: &str, source: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| AwstotalsError::ConfigParse {
            path: source.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AwstotalsError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the language directory.
    pub fn with_lang_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lang_dir = dir.into();
        self
    }

    /// Set the language code.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the AWStats base URL.
    pub fn with_awstats_url(mut self, url: impl Into<String>) -> Self {
        self.awstats_url = url.into();
        self
    }

    /// Set the not-viewed display mode.
    pub fn with_not_viewed(mut self, mode: NotViewedMode) -> Self {
        self.not_viewed = mode;
        self
    }

    /// Set the default sort column.
    pub fn with_sort_default(mut self, sort: SortColumn) -> Self {
        self.sort_default = sort;
        self
    }

    /// Set decimal point and thousands separator.
    pub fn with_separators(mut self, dec_point: &str, thousands_sep: &str) -> Self {
        self.dec_point = dec_point.to_string();
        self.thousands_sep = thousands_sep.to_string();
        self
    }

    /// Append config name patterns to include.
    pub fn allow(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.allow.extend(patterns);
        self
    }

    /// Append config name patterns to exclude.
    pub fn deny(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.deny.extend(patterns);
        self
    }

    /// Compile the allow/deny lists.
    pub fn site_filter(&self) -> Result<SiteFilter> {
        SiteFilter::from_lists(&self.allow, &self.deny)
    }

    /// Path of the language file for the configured language.
    pub fn lang_file(&self) -> PathBuf {
        self.lang_dir.join(format!("awstats-{}.txt", self.lang))
    }
}
