//! Core structs exchanged between the engine and the rendering surface.
//!
//! [`TimelineRecord`] is the dataset input. [`NodeDescriptor`] is what the
//! surface needs to materialize a node, and [`VisualState`] is the per-tick
//! prominence assignment for a mounted node.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Orientation, Side};
use crate::ids::EventId;

// ---------------------------------------------------------------------------
// Dataset input
// ---------------------------------------------------------------------------

/// One entry of the timeline dataset, as supplied by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineRecord {
    /// Explicit identity. Derived from the description when absent.
    #[serde(default)]
    pub id: Option<EventId>,
    /// What happened.
    pub description: String,
    /// Era label, used for grouping and styling only.
    pub era: String,
    /// Free-form date text, e.g. `"13.8 Billion years ago"` or `"1969 CE"`.
    pub date_string: String,
}

impl TimelineRecord {
    /// Build a record without an explicit identity.
    pub fn new(
        description: impl Into<String>,
        era: impl Into<String>,
        date_string: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            description: description.into(),
            era: era.into(),
            date_string: date_string.into(),
        }
    }

    /// The identity used for this record: the explicit ID if present,
    /// otherwise one derived from the description.
    pub fn resolved_id(&self) -> EventId {
        self.id
            .unwrap_or_else(|| EventId::from_description(&self.description))
    }
}

// ---------------------------------------------------------------------------
// Surface-facing output
// ---------------------------------------------------------------------------

/// Everything the surface needs to create the node for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NodeDescriptor {
    /// Stable identity of the event.
    pub id: EventId,
    /// Heading text.
    pub description: String,
    /// Era label shown above the heading.
    pub era: String,
    /// Style class derived from the era, e.g. `era-early-modern`.
    pub era_class: String,
    /// The original date text.
    pub date_text: String,
    /// Offset of the node along the scroll axis.
    pub coordinate: f64,
    /// Which axis `coordinate` is measured on.
    pub orientation: Orientation,
    /// Side of the spine the node is drawn on.
    pub side: Side,
}

/// Visual prominence of a mounted node for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisualState {
    /// Opacity of the info card (0 or 1).
    pub opacity: f64,
    /// Scale of the info card.
    pub scale: f64,
    /// Scale of the spine marker (0 when hidden).
    pub marker_scale: f64,
    /// Whether the node is inside the hot zone.
    pub is_active: bool,
}

impl VisualState {
    /// State of a node outside the hot zone.
    pub const fn inactive(inactive_scale: f64) -> Self {
        Self {
            opacity: 0.0,
            scale: inactive_scale,
            marker_scale: 0.0,
            is_active: false,
        }
    }

    /// State of a node inside the hot zone at the given scale.
    pub const fn active(scale: f64) -> Self {
        Self {
            opacity: 1.0,
            scale,
            marker_scale: scale,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_without_id() {
        let json = r#"{"description":"Big Bang","era":"Pre-Human","date_string":"13.8 Billion years ago"}"#;
        let record: Result<TimelineRecord, _> = serde_json::from_str(json);
        assert!(record.is_ok());
        let record = record.unwrap_or_else(|_| TimelineRecord::new("", "", ""));
        assert_eq!(record.id, None);
        assert_eq!(record.resolved_id(), EventId::from_description("Big Bang"));
    }

    #[test]
    fn explicit_id_wins() {
        let id = EventId::from_description("rome-753");
        let record = TimelineRecord {
            id: Some(id),
            ..TimelineRecord::new("Rome founded", "Classical", "753 BCE")
        };
        assert_eq!(record.resolved_id(), id);
    }

    #[test]
    fn inactive_state_hides_marker() {
        let state = VisualState::inactive(0.5);
        assert!(!state.is_active);
        assert!(state.opacity.abs() < f64::EPSILON);
        assert!(state.marker_scale.abs() < f64::EPSILON);
        assert!((state.scale - 0.5).abs() < f64::EPSILON);
    }
}
