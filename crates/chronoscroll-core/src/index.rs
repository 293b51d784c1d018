//! The event index: every timeline event, resolved and placed on the axis.
//!
//! The index is built once at startup and never mutated. Events are stored
//! ascending by years before present (most future first, most ancient
//! last). Because future times are clamped onto the present, coordinates are
//! not guaranteed to be monotone in that order, so a second ordering by
//! coordinate backs the range queries used by the virtualizer.

use std::collections::BTreeMap;

use chronoscroll_types::{EventId, NodeDescriptor, Orientation, Side, TimelineRecord};
use tracing::{info, warn};

use crate::axis::{AxisError, NonlinearTimeAxis};
use crate::date_parse::DateParser;

/// Errors that can occur while building the index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The dataset has no events, so there is no axis to build.
    #[error("timeline dataset is empty")]
    EmptyDataset,

    /// Two records resolved to the same identity.
    #[error("duplicate event id {id}: {first:?} and {second:?}")]
    DuplicateEvent {
        /// The colliding identity.
        id: EventId,
        /// Description of the first record with this identity.
        first: String,
        /// Description of the second record with this identity.
        second: String,
    },

    /// The axis could not be constructed.
    #[error("axis error: {source}")]
    Axis {
        /// The underlying axis error.
        #[from]
        source: AxisError,
    },
}

/// One resolved event on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    /// Stable identity used for diffing.
    pub id: EventId,
    /// What happened.
    pub description: String,
    /// Era label.
    pub era: String,
    /// Style class derived from the era label.
    pub era_class: String,
    /// The original date text.
    pub date_text: String,
    /// Years before present (negative = future). Always finite.
    pub time_value: f64,
    /// Position on the scroll axis.
    pub axis_coordinate: f64,
    /// Index of this event in the time-sorted sequence.
    pub position: usize,
    /// Side of the spine the event is drawn on.
    pub side: Side,
}

impl TimelineEvent {
    /// Build the surface-facing descriptor for this event.
    pub fn descriptor(&self, orientation: Orientation) -> NodeDescriptor {
        NodeDescriptor {
            id: self.id,
            description: self.description.clone(),
            era: self.era.clone(),
            era_class: self.era_class.clone(),
            date_text: self.date_text.clone(),
            coordinate: self.axis_coordinate,
            orientation,
            side: self.side,
        }
    }
}

/// All events, sorted by time, with their axis placement.
#[derive(Debug, Clone)]
pub struct EventIndex {
    /// Events ascending by `time_value`.
    events: Vec<TimelineEvent>,
    /// Positions into `events`, ascending by `axis_coordinate`.
    by_coordinate: Vec<usize>,
    /// Identity lookup.
    positions: BTreeMap<EventId, usize>,
    /// Events whose date fell back to the present.
    unresolved: Vec<EventId>,
    /// The axis the coordinates were computed on.
    axis: NonlinearTimeAxis,
}

impl EventIndex {
    /// Resolve, sort and place every record.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::EmptyDataset`] for an empty dataset,
    /// [`IndexError::DuplicateEvent`] when two records share an identity, or
    /// [`IndexError::Axis`] for an invalid zoom factor.
    pub fn build(
        records: &[TimelineRecord],
        parser: &DateParser,
        zoom_factor: f64,
    ) -> Result<Self, IndexError> {
        if records.is_empty() {
            return Err(IndexError::EmptyDataset);
        }

        let mut unresolved = Vec::new();
        let mut resolved: Vec<(f64, &TimelineRecord)> = Vec::with_capacity(records.len());
        for record in records {
            let time_value = match parser.parse_detailed(&record.date_string) {
                Ok(date) => date.years_before_present,
                Err(err) => {
                    warn!(
                        event = record.description,
                        date = record.date_string,
                        error = %err,
                        "Could not parse date, placing event at present day"
                    );
                    unresolved.push(record.resolved_id());
                    0.0
                }
            };
            resolved.push((time_value, record));
        }
        resolved.sort_by(|a, b| a.0.total_cmp(&b.0));

        let oldest = resolved.last().map_or(0.0, |(time, _)| *time);
        let axis = NonlinearTimeAxis::new(oldest, zoom_factor)?;

        let mut events: Vec<TimelineEvent> = Vec::with_capacity(resolved.len());
        let mut positions: BTreeMap<EventId, usize> = BTreeMap::new();
        for (position, (time_value, record)) in resolved.into_iter().enumerate() {
            let id = record.resolved_id();
            if let Some(&existing) = positions.get(&id) {
                let first = events
                    .get(existing)
                    .map(|event| event.description.clone())
                    .unwrap_or_default();
                return Err(IndexError::DuplicateEvent {
                    id,
                    first,
                    second: record.description.clone(),
                });
            }
            positions.insert(id, position);
            events.push(TimelineEvent {
                id,
                description: record.description.clone(),
                era: record.era.clone(),
                era_class: era_class(&record.era),
                date_text: record.date_string.clone(),
                time_value,
                axis_coordinate: axis.to_axis(time_value),
                position,
                side: Side::for_position(position),
            });
        }

        let mut by_coordinate: Vec<usize> = (0..events.len()).collect();
        by_coordinate.sort_by(|&a, &b| {
            let ca = events.get(a).map_or(0.0, |e| e.axis_coordinate);
            let cb = events.get(b).map_or(0.0, |e| e.axis_coordinate);
            ca.total_cmp(&cb).then(a.cmp(&b))
        });

        info!(
            events = events.len(),
            unresolved = unresolved.len(),
            oldest_years = oldest,
            extent = axis.extent(),
            "Event index built"
        );

        Ok(Self {
            events,
            by_coordinate,
            positions,
            unresolved,
            axis,
        })
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the index has no events (never true for a built index).
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events ascending by time.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// The event at `position` in time order.
    pub fn get(&self, position: usize) -> Option<&TimelineEvent> {
        self.events.get(position)
    }

    /// Look up an event by identity.
    pub fn get_by_id(&self, id: EventId) -> Option<&TimelineEvent> {
        self.positions.get(&id).and_then(|&p| self.events.get(p))
    }

    /// Identities of events whose date could not be resolved.
    pub fn unresolved(&self) -> &[EventId] {
        &self.unresolved
    }

    /// The axis the coordinates were computed on.
    pub const fn axis(&self) -> &NonlinearTimeAxis {
        &self.axis
    }

    /// Largest time value in the index.
    pub fn oldest_time(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.time_value)
    }

    /// Positions of all events with `low <= coordinate <= high`, ordered by
    /// coordinate. Empty when `low > high`.
    pub fn positions_in_range(&self, low: f64, high: f64) -> &[usize] {
        let coordinate = |p: &usize| self.events.get(*p).map_or(f64::NAN, |e| e.axis_coordinate);
        let start = self.by_coordinate.partition_point(|p| coordinate(p) < low);
        let end = self.by_coordinate.partition_point(|p| coordinate(p) <= high);
        self.by_coordinate.get(start..end).unwrap_or(&[])
    }
}

/// Style class for an era label: `era-` followed by the lowercased label
/// with every run of characters outside `[a-z0-9]` replaced by `-`.
pub fn era_class(era: &str) -> String {
    let mut slug = String::from("era-");
    let mut in_gap = false;
    for ch in era.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }
    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;

    fn parser() -> DateParser {
        DateParser::new(Calendar::fixed(2024).unwrap())
    }

    fn scenario() -> Vec<TimelineRecord> {
        vec![
            TimelineRecord::new("Big Bang", "Pre-Human", "13.8 Billion years ago"),
            TimelineRecord::new("Agriculture", "Agri", "10000 BCE"),
            TimelineRecord::new("Now-ish", "Modern", "2024 CE"),
        ]
    }

    #[test]
    fn scenario_sorts_by_time() {
        let index = EventIndex::build(&scenario(), &parser(), 400.0).unwrap();
        let names: Vec<&str> = index.events().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, ["Now-ish", "Agriculture", "Big Bang"]);

        let times: Vec<f64> = index.events().iter().map(|e| e.time_value).collect();
        assert!(times.first().unwrap().abs() < 1e-9);
        assert!((times.get(1).unwrap() - 12_024.0).abs() < 1e-9);
        assert!((times.get(2).unwrap() - 13.8e9).abs() < 1.0);
        assert!((index.oldest_time() - 13.8e9).abs() < 1.0);
    }

    #[test]
    fn coordinates_follow_the_axis() {
        let index = EventIndex::build(&scenario(), &parser(), 400.0).unwrap();
        let axis = index.axis();
        for event in index.events() {
            assert!((event.axis_coordinate - axis.to_axis(event.time_value)).abs() < 1e-9);
        }
        let big_bang = index.get_by_id(EventId::from_description("Big Bang")).unwrap();
        assert!(big_bang.axis_coordinate.abs() < 1e-6);
        let now = index.get_by_id(EventId::from_description("Now-ish")).unwrap();
        assert!((now.axis_coordinate - axis.extent()).abs() < 1e-9);
    }

    #[test]
    fn sides_alternate_and_positions_match() {
        let index = EventIndex::build(&scenario(), &parser(), 400.0).unwrap();
        for (position, event) in index.events().iter().enumerate() {
            assert_eq!(event.position, position);
            assert_eq!(event.side, Side::for_position(position));
        }
    }

    #[test]
    fn unparseable_dates_are_recorded_and_placed_at_present() {
        let mut records = scenario();
        records.push(TimelineRecord::new("Mystery", "Unknown", "once upon a time"));
        let index = EventIndex::build(&records, &parser(), 400.0).unwrap();
        let mystery_id = EventId::from_description("Mystery");
        assert_eq!(index.unresolved(), [mystery_id]);
        let mystery = index.get_by_id(mystery_id).unwrap();
        assert!(mystery.time_value.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let result = EventIndex::build(&[], &parser(), 400.0);
        assert!(matches!(result, Err(IndexError::EmptyDataset)));
    }

    #[test]
    fn duplicate_descriptions_are_rejected() {
        let mut records = scenario();
        records.push(TimelineRecord::new("Agriculture", "Agri", "9000 BCE"));
        let result = EventIndex::build(&records, &parser(), 400.0);
        assert!(matches!(result, Err(IndexError::DuplicateEvent { .. })));
    }

    #[test]
    fn explicit_ids_allow_repeated_descriptions() {
        let mut records = scenario();
        records.push(TimelineRecord {
            id: Some(EventId::from_description("Agriculture, Levant site")),
            ..TimelineRecord::new("Agriculture", "Agri", "9000 BCE")
        });
        let index = EventIndex::build(&records, &parser(), 400.0).unwrap();
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn invalid_zoom_is_rejected() {
        let result = EventIndex::build(&scenario(), &parser(), 0.0);
        assert!(matches!(result, Err(IndexError::Axis { .. })));
    }

    #[test]
    fn range_query_is_inclusive() {
        let index = EventIndex::build(&scenario(), &parser(), 400.0).unwrap();
        let agriculture = index.get_by_id(EventId::from_description("Agriculture")).unwrap();
        let c = agriculture.axis_coordinate;

        assert_eq!(index.positions_in_range(c, c), [agriculture.position]);
        assert!(index.positions_in_range(c + 1e-6, c + 1.0).is_empty());
        assert_eq!(index.positions_in_range(f64::NEG_INFINITY, f64::INFINITY).len(), 3);
        assert!(index.positions_in_range(10.0, 5.0).is_empty());
    }

    #[test]
    fn future_events_share_the_present_coordinate() {
        let records = vec![
            TimelineRecord::new("Mars landing", "Future", "2050 CE (Projected)"),
            TimelineRecord::new("Today", "Modern", "2024 CE"),
            TimelineRecord::new("Pyramids", "Ancient", "2560 BCE"),
        ];
        let index = EventIndex::build(&records, &parser(), 400.0).unwrap();
        let extent = index.axis().extent();
        let hits = index.positions_in_range(extent, extent);
        assert_eq!(hits.len(), 2);
        assert_eq!(index.get(0).unwrap().description, "Mars landing");
    }

    #[test]
    fn era_class_slugs() {
        assert_eq!(era_class("Pre-Human"), "era-pre-human");
        assert_eq!(era_class("Early Modern Period"), "era-early-modern-period");
        assert_eq!(era_class("Bronze & Iron Age!"), "era-bronze-iron-age-");
        assert_eq!(era_class("20th Century"), "era-20th-century");
    }
}
