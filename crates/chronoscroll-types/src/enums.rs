//! Enumeration types for the Chronoscroll timeline engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which side of the timeline spine a node is drawn on.
///
/// Nodes alternate sides by their position in the time-sorted index so that
/// neighbours do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Drawn to the right of (or below) the spine.
    Right,
    /// Drawn to the left of (or above) the spine.
    Left,
}

impl Side {
    /// Side for the node at `position` in the sorted index (even = right).
    pub const fn for_position(position: usize) -> Self {
        if position % 2 == 0 { Self::Right } else { Self::Left }
    }
}

/// Scroll dimension of the page.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Axis coordinates are vertical offsets (`top`).
    #[default]
    Vertical,
    /// Axis coordinates are horizontal offsets (`left`).
    Horizontal,
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Which visible nodes the activation engine may bring into focus.
///
/// The two policies are mutually exclusive and must be chosen in
/// configuration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ActivationPolicy {
    /// Every node inside the activation radius is active.
    #[default]
    AllInRadius,
    /// Only the single node nearest the center (and inside the radius) is active.
    NearestOnly,
}

// ---------------------------------------------------------------------------
// Dates and labels
// ---------------------------------------------------------------------------

/// The date grammar form that resolved a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum DateForm {
    /// `"<number> billion years ago"`.
    BillionYearsAgo,
    /// `"<number> million years ago"`.
    MillionYearsAgo,
    /// `"<number> years ago"`.
    YearsAgo,
    /// A calendar year suffixed with `BCE`.
    BeforeCommonEra,
    /// A calendar year suffixed with `CE`, optionally approximate or projected.
    CommonEra,
    /// A bare integer, read as a CE year.
    BareYear,
}

/// Formatting tier chosen for the center-time label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum DisplayTier {
    /// A future calendar year, e.g. `2100 CE (Projected)`.
    Projected,
    /// A CE calendar year, e.g. `1969 CE`.
    CommonEra,
    /// A BCE calendar year, e.g. `3000 BCE`.
    BeforeCommonEra,
    /// Thousands of years ago, e.g. `50000 Years Ago`.
    YearsAgo,
    /// Millions of years ago, e.g. `2.50 Million Years Ago`.
    MillionsAgo,
    /// Billions of years ago, e.g. `13.80 Billion Years Ago`.
    BillionsAgo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_alternate() {
        assert_eq!(Side::for_position(0), Side::Right);
        assert_eq!(Side::for_position(1), Side::Left);
        assert_eq!(Side::for_position(2), Side::Right);
    }

    #[test]
    fn policy_uses_snake_case() {
        let json = serde_json::to_string(&ActivationPolicy::NearestOnly).ok();
        assert_eq!(json.as_deref(), Some("\"nearest_only\""));
        let parsed: Result<ActivationPolicy, _> = serde_json::from_str("\"all_in_radius\"");
        assert_eq!(parsed.ok(), Some(ActivationPolicy::AllInRadius));
    }

    #[test]
    fn defaults() {
        assert_eq!(Orientation::default(), Orientation::Vertical);
        assert_eq!(ActivationPolicy::default(), ActivationPolicy::AllInRadius);
    }
}
