//! Human-readable label for the time under the viewport center.
//!
//! The label switches units as the center moves through deep time:
//! - `t <= -1`: "2050 CE (Projected)"
//! - `t < currentYear - 1`: "1969 CE"
//! - `t < 10 000`: "753 BCE"
//! - `t < 1e6`: "50000 Years Ago" (nearest thousand)
//! - `t < 1e9`: "66.00 Million Years Ago"
//! - otherwise: "13.80 Billion Years Ago"
//!
//! Anything less than a year either side of the present reads as the current
//! year. Rounding is half-up, including the two decimals of the million and
//! billion tiers. The stretch just before 1 CE renders as "1 BCE" rather
//! than "0 BCE".

use chronoscroll_types::DisplayTier;

use crate::calendar::Calendar;

/// Lower bound of the "Years Ago" tier.
const YEARS_AGO_FLOOR: f64 = 10_000.0;

/// Lower bound of the "Million Years Ago" tier.
const MILLION: f64 = 1e6;

/// Lower bound of the "Billion Years Ago" tier.
const BILLION: f64 = 1e9;

/// Which tier a time value falls into. NaN is treated as the present.
pub fn classify(years_before_present: f64, calendar: Calendar) -> DisplayTier {
    let t = present_if_nan(years_before_present);
    if t <= -1.0 {
        DisplayTier::Projected
    } else if t < calendar.current_year_f64() - 1.0 {
        DisplayTier::CommonEra
    } else if t < YEARS_AGO_FLOOR {
        DisplayTier::BeforeCommonEra
    } else if t < MILLION {
        DisplayTier::YearsAgo
    } else if t < BILLION {
        DisplayTier::MillionsAgo
    } else {
        DisplayTier::BillionsAgo
    }
}

/// Format a time value as a center label.
pub fn format_display(years_before_present: f64, calendar: Calendar) -> String {
    let t = present_if_nan(years_before_present);
    let year = calendar.current_year_f64();
    match classify(t, calendar) {
        DisplayTier::Projected => format!("{:.0} CE (Projected)", year + round_half_up(t).abs()),
        DisplayTier::CommonEra if t < 1.0 => format!("{year:.0} CE"),
        DisplayTier::CommonEra => format!("{:.0} CE", year - round_half_up(t)),
        DisplayTier::BeforeCommonEra => {
            format!("{:.0} BCE", round_half_up(t - year).max(1.0))
        }
        DisplayTier::YearsAgo => format!("{:.0} Years Ago", round_half_up(t / 1000.0) * 1000.0),
        DisplayTier::MillionsAgo => {
            format!("{:.2} Million Years Ago", round_to_hundredths(t / MILLION))
        }
        DisplayTier::BillionsAgo => {
            format!("{:.2} Billion Years Ago", round_to_hundredths(t / BILLION))
        }
    }
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn round_to_hundredths(x: f64) -> f64 {
    round_half_up(x * 100.0) / 100.0
}

const fn present_if_nan(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t }
}
