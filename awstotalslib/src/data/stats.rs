//! Core data structures for AWStats traffic figures.
//!
//! `PeriodAggregate` is the unit everything else is built from: the
//! summary of one site's database file for one month. Reports are sums
//! of aggregates, and totals are sums of report rows.
//!
//! Visits and unique visitors come from the GENERAL section and may be
//! unknown (`None`) when a caller asks for a null default. Everything
//! else is summed from the TIME section and is always a number.

use serde::Serialize;
use std::ops::{Add, AddAssign};

use crate::query::options::SortColumn;

/// Sum two optional counters; `None` is the identity.
fn add_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.saturating_add(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Traffic figures of one site for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodAggregate {
    /// Site config name (empty for grand totals)
    pub config: String,
    pub visits: Option<u64>,
    pub unique: Option<u64>,
    pub pages: u64,
    pub hits: u64,
    pub bandwidth: u64,
    pub not_viewed_pages: u64,
    pub not_viewed_hits: u64,
    pub not_viewed_bandwidth: u64,
}

impl PeriodAggregate {
    /// Create an all-zero aggregate whose visits/unique are `default`.
    pub fn new(config: impl Into<String>, default: Option<u64>) -> Self {
        Self {
            config: config.into(),
            visits: default,
            unique: default,
            ..Self::default()
        }
    }

    /// Add the not-viewed figures into the viewed ones.
    ///
    /// The not-viewed fields keep their values.
    pub fn fold_not_viewed(&mut self) {
        self.pages = self.pages.saturating_add(self.not_viewed_pages);
        self.hits = self.hits.saturating_add(self.not_viewed_hits);
        self.bandwidth = self.bandwidth.saturating_add(self.not_viewed_bandwidth);
    }

    /// Add another aggregate's viewed figures, leaving not-viewed untouched.
    pub fn add_viewed(&mut self, other: &Self) {
        self.visits = add_opt(self.visits, other.visits);
        self.unique = add_opt(self.unique, other.unique);
        self.pages = self.pages.saturating_add(other.pages);
        self.hits = self.hits.saturating_add(other.hits);
        self.bandwidth = self.bandwidth.saturating_add(other.bandwidth);
    }

    /// Add another aggregate's not-viewed figures.
    pub fn add_not_viewed(&mut self, other: &Self) {
        self.not_viewed_pages = self.not_viewed_pages.saturating_add(other.not_viewed_pages);
        self.not_viewed_hits = self.not_viewed_hits.saturating_add(other.not_viewed_hits);
        self.not_viewed_bandwidth = self
            .not_viewed_bandwidth
            .saturating_add(other.not_viewed_bandwidth);
    }

    /// Numeric value of a sort column (`Config` and unknown counters sort as 0).
    pub fn sort_key(&self, column: SortColumn) -> u64 {
        match column {
            SortColumn::Config => 0,
            SortColumn::Visits => self.visits.unwrap_or(0),
            SortColumn::Unique => self.unique.unwrap_or(0),
            SortColumn::Pages => self.pages,
            SortColumn::Hits => self.hits,
            SortColumn::Bandwidth => self.bandwidth,
            SortColumn::NotViewedPages => self.not_viewed_pages,
            SortColumn::NotViewedHits => self.not_viewed_hits,
            SortColumn::NotViewedBandwidth => self.not_viewed_bandwidth,
        }
    }
}

impl AddAssign<&PeriodAggregate> for PeriodAggregate {
    fn add_assign(&mut self, other: &PeriodAggregate) {
        self.add_viewed(other);
        self.add_not_viewed(other);
    }
}

impl AddAssign for PeriodAggregate {
    fn add_assign(&mut self, other: Self) {
        *self += &other;
    }
}

impl Add for PeriodAggregate {
    type Output = Self;

    /// Keeps the left-hand config name.
    fn add(mut self, other: Self) -> Self {
        self += &other;
        self
    }
}

/// Traffic of one calendar day. `None` means AWStats recorded nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub pages: Option<u64>,
    pub hits: Option<u64>,
    pub bandwidth: Option<u64>,
    pub visits: Option<u64>,
}
