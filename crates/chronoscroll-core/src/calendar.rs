//! Calendar anchor for "years before present".
//!
//! Every CE/BCE conversion in the engine is relative to the current calendar
//! year. The calendar is the single source of that year: it is either read
//! from the system clock once at startup or pinned by configuration, so that
//! the date parser and the center label always agree on what "now" means.

use chrono::{Datelike, Utc};

use crate::config::CalendarConfig;

/// Earliest calendar year accepted as "now".
const MIN_YEAR: i32 = 1;

/// Latest calendar year accepted as "now".
const MAX_YEAR: i32 = 9999;

/// Errors that can occur when establishing the calendar anchor.
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    /// The configured current year is outside the supported range.
    #[error("current year {year} is outside the supported range {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfRange {
        /// The rejected year.
        year: i32,
    },
}

/// The calendar year treated as the present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    /// Current calendar year (CE).
    current_year: i32,
}

impl Calendar {
    /// Anchor the calendar at the system clock's current year (UTC).
    pub fn system() -> Self {
        Self {
            current_year: Utc::now().year(),
        }
    }

    /// Anchor the calendar at an explicit year.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::YearOutOfRange`] if the year is not in
    /// `1..=9999`.
    pub const fn fixed(year: i32) -> Result<Self, CalendarError> {
        if year < MIN_YEAR || year > MAX_YEAR {
            return Err(CalendarError::YearOutOfRange { year });
        }
        Ok(Self { current_year: year })
    }

    /// Build the calendar from configuration: a pinned year if one is set,
    /// otherwise the system year.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::YearOutOfRange`] for an invalid pinned year.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, CalendarError> {
        config
            .current_year
            .map_or_else(|| Ok(Self::system()), Self::fixed)
    }

    /// Return the current calendar year.
    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Return the current calendar year as a float for time arithmetic.
    pub fn current_year_f64(&self) -> f64 {
        f64::from(self.current_year)
    }
}
