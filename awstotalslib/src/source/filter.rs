//! Site allow-list / deny-list filtering.
//!
//! Entries are glob patterns matched against the whole config name, so a
//! plain name like `www.example.com` matches only itself while
//! `*.example.com` matches every subdomain.

use glob::Pattern;

use crate::error::AwstotalsError;
use crate::Result;

/// Which site configs take part in a report.
#[derive(Debug, Clone, Default)]
pub struct SiteFilter {
    /// Patterns to include (if empty, include every config)
    pub allow: Vec<Pattern>,
    /// Patterns to exclude
    pub deny: Vec<Pattern>,
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| AwstotalsError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

impl SiteFilter {
    /// Create a filter that lets every config through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allow pattern.
    pub fn allow(mut self, pattern: &str) -> Result<Self> {
        self.allow.push(compile(pattern)?);
        Ok(self)
    }

    /// Add a deny pattern.
    pub fn deny(mut self, pattern: &str) -> Result<Self> {
        self.deny.push(compile(pattern)?);
        Ok(self)
    }

    /// Build a filter from allow and deny lists.
    pub fn from_lists<S: AsRef<str>>(allow: &[S], deny: &[S]) -> Result<Self> {
        let mut filter = Self::new();
        for pattern in allow {
            filter = filter.allow(pattern.as_ref())?;
        }
        for pattern in deny {
            filter = filter.deny(pattern.as_ref())?;
        }
        Ok(filter)
    }

    /// Check whether a config name passes the filter.
    ///
    /// A config passes if the allow-list is empty or one of its patterns
    /// matches, and no deny pattern matches.
    pub fn matches(&self, config: &str) -> bool {
        if self.deny.iter().any(|p| p.matches(config)) {
            return false;
        }

        self.allow.is_empty() || self.allow.iter().any(|p| p.matches(config))
    }
}
