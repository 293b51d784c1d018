//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Every timeline event carries a strongly-typed ID that the virtualizer uses
//! as its diffing key. Datasets may supply IDs explicitly; when they do not,
//! a deterministic UUID v5 is derived from the event description so that the
//! same dataset always produces the same identities across reloads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Namespace for description-derived event identifiers.
const EVENT_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a54_9d3e_4b7a_8c21_5e0f_d4b3_a917);

/// Unique identifier for an event on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventId(pub Uuid);

impl EventId {
    /// Derive a stable identifier from an event description (UUID v5).
    ///
    /// Two events with the same description map to the same ID; the index
    /// rejects such collisions at build time.
    pub fn from_description(description: &str) -> Self {
        Self(Uuid::new_v5(&EVENT_NAMESPACE, description.as_bytes()))
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<EventId> for Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}
