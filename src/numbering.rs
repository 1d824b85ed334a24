//! Human-readable document numbers.

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;

/// How numbers are generated for documents saved without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingScheme {
    /// `{PREFIX}-{year}-{seq:04}`, where `seq` is the loaded count plus one.
    #[default]
    Sequential,
    /// `{PREFIX}-{YYYYMMDD}-{random 1000..=9999}`.
    DateRandom,
}

impl NumberingScheme {
    /// Candidate number for a collection that currently holds `count`
    /// documents. Not guaranteed to be free.
    pub fn generate(&self, prefix: &str, today: NaiveDate, count: usize) -> String {
        match self {
            NumberingScheme::Sequential => sequential(prefix, today.year(), count + 1),
            NumberingScheme::DateRandom => {
                date_random(prefix, today, rand::rng().random_range(1000..=9999))
            }
        }
    }
}

pub(crate) fn sequential(prefix: &str, year: i32, seq: usize) -> String {
    format!("{}-{}-{:04}", prefix, year, seq)
}

pub(crate) fn date_random(prefix: &str, date: NaiveDate, suffix: u16) -> String {
    format!("{}-{}-{}", prefix, date.format("%Y%m%d"), suffix)
}

/// Source of "today" for number generation and issue dates.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        FixedClock(date)
    }

    /// Shorthand for tests. Returns `None` for an invalid calendar date.
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
