use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime};

use crate::error::{LedgerError, Result};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The month being viewed, anchored on a full timestamp.
///
/// Month arithmetic clamps the day to the target month's length, so
/// Jan 31 moves to Feb 28/29. Navigation is unbounded; a step past the
/// calendar's representable range leaves the cursor where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthCursor {
    at: NaiveDateTime,
}

impl MonthCursor {
    pub(crate) fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    pub(crate) fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub(crate) fn timestamp(&self) -> NaiveDateTime {
        self.at
    }

    pub(crate) fn year(&self) -> i32 {
        self.at.year()
    }

    /// 1-based.
    pub(crate) fn month(&self) -> u32 {
        self.at.month()
    }

    pub(crate) fn set(&mut self, at: NaiveDateTime) {
        self.at = at;
    }

    pub(crate) fn previous_month(&mut self) {
        self.shift_back(1);
    }

    pub(crate) fn next_month(&mut self) {
        self.shift_forward(1);
    }

    pub(crate) fn previous_year(&mut self) {
        self.shift_back(12);
    }

    pub(crate) fn next_year(&mut self) {
        self.shift_forward(12);
    }

    /// Absolute jump, keeping the time of day and clamping the day of month.
    pub(crate) fn jump_to_month(&mut self, year: i32, month: u32) -> Result<()> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::Validation(format!(
                "Invalid month {month}: expected 1-12"
            )));
        }
        let day = self.at.day().min(super::days_in_month(year, month));
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| LedgerError::Validation(format!("Year {year} is out of range")))?;
        self.at = date.and_time(self.at.time());
        Ok(())
    }

    fn shift_forward(&mut self, months: u32) {
        match self.at.checked_add_months(Months::new(months)) {
            Some(at) => self.at = at,
            None => tracing::warn!("cannot move cursor {months} month(s) past {}", self.key()),
        }
    }

    fn shift_back(&mut self, months: u32) {
        match self.at.checked_sub_months(Months::new(months)) {
            Some(at) => self.at = at,
            None => tracing::warn!("cannot move cursor {months} month(s) before {}", self.key()),
        }
    }

    /// `YYYY-MM`.
    pub(crate) fn key(&self) -> String {
        self.at.format("%Y-%m").to_string()
    }

    /// e.g. `March 2024`.
    pub(crate) fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year())
    }

    pub(crate) fn month_name(&self) -> &'static str {
        MONTH_NAMES
            .get(self.at.month0() as usize)
            .copied()
            .unwrap_or_default()
    }
}

/// Parse `YYYY-MM` (also `YYYY-M`) into a year and a 1-based month.
pub(crate) fn parse_month_key(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}
