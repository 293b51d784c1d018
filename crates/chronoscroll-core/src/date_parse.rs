//! Date expression parsing into years before present.
//!
//! Dataset dates are free-form strings such as `"13.8 Billion years ago"`,
//! `"10000 BCE"`, `"c. 1450 CE"`, `"2050 CE (Projected)"` or `"1928"`. The
//! parser resolves each to a signed number of years before present, where
//! larger values lie further in the past and negative values lie in the
//! future.
//!
//! Forms are tried in priority order and the first match wins:
//!
//! 1. `<number> billion years ago`
//! 2. `<number> million years ago`
//! 3. `<number> years ago` (integer part only)
//! 4. anything containing `bce`
//! 5. anything containing `ce`
//! 6. a bare integer, read as a CE year
//!
//! [`DateParser::parse`] is total: input that resolves to nothing usable
//! yields `0.0` and a warning on the tracing channel.

use chronoscroll_types::DateForm;
use tracing::warn;

use crate::calendar::Calendar;

/// Why a date string could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    /// The text matched none of the known forms.
    #[error("unrecognized date expression: {text:?}")]
    Unrecognized {
        /// The original date text.
        text: String,
    },

    /// The text matched a form but carried no leading number.
    #[error("date expression {text:?} looks like {form:?} but has no number")]
    MissingNumber {
        /// The original date text.
        text: String,
        /// The form whose keyword matched.
        form: DateForm,
    },

    /// The number resolved to an infinite or NaN value.
    #[error("date expression {text:?} resolves to a non-finite value")]
    NonFinite {
        /// The original date text.
        text: String,
    },
}

/// A successfully resolved date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDate {
    /// Years before present (negative = future).
    pub years_before_present: f64,
    /// The grammar form that matched.
    pub form: DateForm,
}

/// Parses date expressions relative to a fixed calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    calendar: Calendar,
}

impl DateParser {
    /// Create a parser anchored at the given calendar.
    pub const fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    /// Return the calendar this parser resolves against.
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Resolve a date string to years before present.
    ///
    /// Never fails: unresolvable input logs a warning and returns `0.0`.
    pub fn parse(&self, text: &str) -> f64 {
        match self.parse_detailed(text) {
            Ok(resolved) => resolved.years_before_present,
            Err(err) => {
                warn!(date = text, error = %err, "Could not parse date, using present day");
                0.0
            }
        }
    }

    /// Resolve a date string, reporting which form matched or why none did.
    ///
    /// # Errors
    ///
    /// Returns a [`DateParseError`] describing why the text has no usable
    /// value. The error is informational; [`parse`](Self::parse) recovers
    /// from it.
    pub fn parse_detailed(&self, text: &str) -> Result<ResolvedDate, DateParseError> {
        let lower = text.to_lowercase();
        let now = self.calendar.current_year_f64();

        let (form, value) = if lower.contains("billion years ago") {
            let number =
                leading_float(&lower).ok_or_else(|| missing(text, DateForm::BillionYearsAgo))?;
            (DateForm::BillionYearsAgo, number * 1e9)
        } else if lower.contains("million years ago") {
            let number =
                leading_float(&lower).ok_or_else(|| missing(text, DateForm::MillionYearsAgo))?;
            (DateForm::MillionYearsAgo, number * 1e6)
        } else if lower.contains("years ago") {
            let number = leading_int(&lower).ok_or_else(|| missing(text, DateForm::YearsAgo))?;
            (DateForm::YearsAgo, number)
        } else if lower.contains("bce") {
            let stripped = lower.replacen("bce", "", 1);
            let year = leading_int(strip_circa(stripped.trim()))
                .ok_or_else(|| missing(text, DateForm::BeforeCommonEra))?;
            (DateForm::BeforeCommonEra, year + now)
        } else if lower.contains("ce") {
            let stripped = strip_ce_decorations(&lower);
            let year =
                leading_int(stripped.trim()).ok_or_else(|| missing(text, DateForm::CommonEra))?;
            (DateForm::CommonEra, now - year)
        } else if let Ok(year) = text.trim().parse::<i64>() {
            (DateForm::BareYear, now - int_to_f64(year))
        } else {
            return Err(DateParseError::Unrecognized {
                text: text.to_owned(),
            });
        };

        if !value.is_finite() {
            return Err(DateParseError::NonFinite {
                text: text.to_owned(),
            });
        }

        Ok(ResolvedDate {
            years_before_present: value,
            form,
        })
    }
}

fn missing(text: &str, form: DateForm) -> DateParseError {
    DateParseError::MissingNumber {
        text: text.to_owned(),
        form,
    }
}

/// Drop a leading `c.` approximation marker and the whitespace after it.
fn strip_circa(text: &str) -> &str {
    text.strip_prefix("c.").map_or(text, str::trim_start)
}

/// Remove every `c.` marker (with trailing whitespace), `ce` and
/// `(projected)` from a lowercased CE date.
fn strip_ce_decorations(lower: &str) -> String {
    let mut out = String::with_capacity(lower.len());
    let mut rest = lower;
    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("c.") {
            rest = after.trim_start();
        } else if let Some(after) = rest.strip_prefix("ce") {
            rest = after;
        } else if let Some(after) = rest.strip_prefix("(projected)") {
            rest = after;
        } else {
            out.push(ch);
            rest = rest.get(ch.len_utf8()..).unwrap_or("");
        }
    }
    out
}

/// Length in bytes of the run of ASCII digits at the start of `text`.
fn digit_run(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Length in bytes of an optional leading `+`/`-`.
fn sign_len(text: &str) -> usize {
    usize::from(text.starts_with(['+', '-']))
}

/// Parse the leading integer of `text` (after leading whitespace), ignoring
/// anything that follows it.
fn leading_int(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let sign = sign_len(text);
    let digits = digit_run(text.get(sign..)?);
    if digits == 0 {
        return None;
    }
    text.get(..sign.saturating_add(digits))?.parse::<f64>().ok()
}

/// Parse the leading decimal number of `text` (after leading whitespace):
/// optional sign, digits, optional fraction and optional exponent.
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = sign_len(text);
    let int_digits = digit_run(text.get(end..)?);
    end = end.saturating_add(int_digits);

    let mut frac_digits = 0;
    if text.get(end..)?.starts_with('.') {
        frac_digits = digit_run(text.get(end.saturating_add(1)..)?);
        if frac_digits > 0 || int_digits > 0 {
            end = end.saturating_add(1).saturating_add(frac_digits);
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    let tail = text.get(end..)?;
    if tail.starts_with(['e', 'E']) {
        let exp_start = end.saturating_add(1);
        let exp_sign = sign_len(text.get(exp_start..)?);
        let exp_digits = digit_run(text.get(exp_start.saturating_add(exp_sign)..)?);
        if exp_digits > 0 {
            end = exp_start.saturating_add(exp_sign).saturating_add(exp_digits);
        }
    }

    text.get(..end)?.parse::<f64>().ok()
}

#[allow(clippy::cast_precision_loss)]
const fn int_to_f64(value: i64) -> f64 {
    value as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parser() -> DateParser {
        DateParser::new(Calendar::fixed(2024).unwrap())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn billions_of_years() {
        let resolved = parser().parse_detailed("13.8 Billion years ago").unwrap();
        assert_eq!(resolved.form, DateForm::BillionYearsAgo);
        assert!(approx(resolved.years_before_present, 13.8e9));
    }

    #[test]
    fn millions_of_years() {
        let resolved = parser().parse_detailed("66 million years ago").unwrap();
        assert_eq!(resolved.form, DateForm::MillionYearsAgo);
        assert!(approx(resolved.years_before_present, 66e6));

        let fractional = parser().parse("2.5 Million Years Ago");
        assert!(approx(fractional, 2.5e6));
    }

    #[test]
    fn plain_years_ago_truncates() {
        let resolved = parser().parse_detailed("300000 years ago").unwrap();
        assert_eq!(resolved.form, DateForm::YearsAgo);
        assert!(approx(resolved.years_before_present, 300_000.0));

        assert!(approx(parser().parse("70000.9 years ago"), 70_000.0));
    }

    #[test]
    fn bce_years_add_current_year() {
        let resolved = parser().parse_detailed("10000 BCE").unwrap();
        assert_eq!(resolved.form, DateForm::BeforeCommonEra);
        assert!(approx(resolved.years_before_present, 12_024.0));

        assert!(approx(parser().parse("c. 3000 BCE"), 5_024.0));
        assert!(approx(parser().parse("753 bce (traditional)"), 2_777.0));
    }

    #[test]
    fn ce_years_subtract_from_current_year() {
        let resolved = parser().parse_detailed("2024 CE").unwrap();
        assert_eq!(resolved.form, DateForm::CommonEra);
        assert!(approx(resolved.years_before_present, 0.0));

        assert!(approx(parser().parse("c. 1450 CE"), 574.0));
        assert!(approx(parser().parse("1969 ce"), 55.0));
    }

    #[test]
    fn projected_years_are_negative() {
        let value = parser().parse("2050 CE (Projected)");
        assert!(approx(value, -26.0));
    }

    #[test]
    fn bare_integer_is_a_ce_year() {
        let resolved = parser().parse_detailed("1928").unwrap();
        assert_eq!(resolved.form, DateForm::BareYear);
        assert!(approx(resolved.years_before_present, 96.0));

        assert!(approx(parser().parse("  1066 "), 958.0));
    }

    #[test]
    fn bare_integer_must_be_whole_string() {
        let result = parser().parse_detailed("1928 or so");
        assert!(matches!(result, Err(DateParseError::Unrecognized { .. })));
    }

    #[test]
    fn first_matching_form_wins() {
        // "billion years ago" also contains "years ago".
        let resolved = parser().parse_detailed("4.5 billion years ago").unwrap();
        assert_eq!(resolved.form, DateForm::BillionYearsAgo);
    }

    #[test]
    fn unrecognized_falls_back_to_zero() {
        assert!(approx(parser().parse("the dawn of time"), 0.0));
        let result = parser().parse_detailed("the dawn of time");
        assert!(matches!(result, Err(DateParseError::Unrecognized { .. })));
    }

    #[test]
    fn keyword_without_number_falls_back_to_zero() {
        let result = parser().parse_detailed("many million years ago");
        assert!(matches!(
            result,
            Err(DateParseError::MissingNumber {
                form: DateForm::MillionYearsAgo,
                ..
            })
        ));
        assert!(approx(parser().parse("many million years ago"), 0.0));
    }

    #[test]
    fn ce_keyword_inside_word_without_year_falls_back() {
        // "ce" matches inside "since"; no year remains after stripping.
        assert!(approx(parser().parse("ever since"), 0.0));
    }

    #[test]
    fn overflowing_number_falls_back() {
        let result = parser().parse_detailed("1e400 billion years ago");
        assert!(matches!(result, Err(DateParseError::NonFinite { .. })));
        assert!(approx(parser().parse("1e400 billion years ago"), 0.0));
    }

    #[test]
    fn parse_is_total_and_finite() {
        let inputs = [
            "",
            " ",
            "-",
            ".",
            "BCE",
            "CE",
            "c.",
            "(projected)",
            "1.2.3 million years ago",
            "e5 billion years ago",
            "99999999999999999999999",
            "\u{1F30D} 12 years ago",
            "-5 years ago",
        ];
        for input in inputs {
            let value = parser().parse(input);
            assert!(value.is_finite(), "non-finite for {input:?}");
        }
    }

    #[test]
    fn leading_number_helpers() {
        assert_eq!(leading_int("  42abc"), Some(42.0));
        assert_eq!(leading_int("-7 years"), Some(-7.0));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_float("13.8 billion"), Some(13.8));
        assert_eq!(leading_float(".5 million"), Some(0.5));
        assert_eq!(leading_float("3. million"), Some(3.0));
        assert_eq!(leading_float("2e3 years"), Some(2000.0));
        assert_eq!(leading_float("2e years"), Some(2.0));
        assert_eq!(leading_float("."), None);
    }

    #[test]
    fn ce_decorations_are_stripped() {
        assert_eq!(strip_ce_decorations("c. 1450 ce").trim(), "1450");
        assert_eq!(strip_ce_decorations("2100 ce (projected)").trim(), "2100");
    }
}
