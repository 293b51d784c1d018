//! Windowed mount/unmount of timeline nodes.
//!
//! Only events whose coordinate falls inside the scroll window (the viewport
//! plus a buffer on either side) exist as live nodes. On every tick the
//! virtualizer diffs the events in the window against the [`VisibleSet`] by
//! identity and emits the minimal set of mounts and unmounts. Nodes that
//! stay in range are never touched, so any visual state already applied to
//! them survives the update.
//!
//! After [`ViewportVirtualizer::update`] returns `Ok`, the visible set holds
//! exactly the events with `window.low <= coordinate <= window.high`.

use std::collections::{BTreeMap, BTreeSet};

use chronoscroll_types::{EventId, Orientation};
use tracing::debug;

use crate::index::EventIndex;
use crate::surface::{RenderSurface, SurfaceError};

/// Closed interval of axis coordinates that should be materialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWindow {
    /// Lowest coordinate in the window (inclusive).
    pub low: f64,
    /// Highest coordinate in the window (inclusive).
    pub high: f64,
}

impl ScrollWindow {
    /// A window spanning `low..=high`.
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// The window for a viewport at `offset` of the given `length`, widened
    /// by `buffer` on both sides.
    pub fn around(offset: f64, length: f64, buffer: f64) -> Self {
        Self {
            low: offset - buffer,
            high: offset + length + buffer,
        }
    }

    /// Whether `coordinate` lies inside the window.
    pub fn contains(&self, coordinate: f64) -> bool {
        self.low <= coordinate && coordinate <= self.high
    }
}

/// A live node tracked by the [`VisibleSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNode<H> {
    /// Surface handle returned at mount time.
    pub handle: H,
    /// Position of the event in the index.
    pub position: usize,
}

/// The events currently materialized on the surface, keyed by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSet<H> {
    nodes: BTreeMap<EventId, VisibleNode<H>>,
}

impl<H> Default for VisibleSet<H> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }
}

impl<H> VisibleSet<H> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the event is mounted.
    pub fn contains(&self, id: EventId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The live node for an event.
    pub fn get(&self, id: EventId) -> Option<&VisibleNode<H>> {
        self.nodes.get(&id)
    }

    /// Identities of all mounted events.
    pub fn ids(&self) -> BTreeSet<EventId> {
        self.nodes.keys().copied().collect()
    }

    /// Iterate over mounted events and their nodes.
    pub fn iter(&self) -> impl Iterator<Item = (&EventId, &VisibleNode<H>)> {
        self.nodes.iter()
    }
}

/// Mounts and unmounts needed to bring a [`VisibleSet`] in line with a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Index positions of events to mount, ascending.
    pub to_mount: Vec<usize>,
    /// Identities of events to unmount.
    pub to_unmount: Vec<EventId>,
}

impl UpdatePlan {
    /// Whether the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.to_mount.is_empty() && self.to_unmount.is_empty()
    }
}

/// What an applied update did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Nodes created.
    pub mounted: usize,
    /// Nodes destroyed.
    pub unmounted: usize,
}

/// Diffs scroll windows against the visible set and drives the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportVirtualizer {
    orientation: Orientation,
}

impl ViewportVirtualizer {
    /// Create a virtualizer that mounts nodes along `orientation`.
    pub const fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    /// Compute the mounts and unmounts for `window` without touching the
    /// surface.
    pub fn plan<H>(
        &self,
        index: &EventIndex,
        visible: &VisibleSet<H>,
        window: ScrollWindow,
    ) -> UpdatePlan {
        let in_window = index.positions_in_range(window.low, window.high);

        let wanted: BTreeSet<EventId> = in_window
            .iter()
            .filter_map(|&p| index.get(p).map(|e| e.id))
            .collect();

        let to_unmount = visible
            .nodes
            .keys()
            .filter(|id| !wanted.contains(*id))
            .copied()
            .collect();

        let mut to_mount: Vec<usize> = in_window
            .iter()
            .copied()
            .filter(|&p| index.get(p).is_some_and(|e| !visible.contains(e.id)))
            .collect();
        to_mount.sort_unstable();

        UpdatePlan {
            to_mount,
            to_unmount,
        }
    }

    /// Carry out a plan: unmount first, then mount.
    ///
    /// The visible set only changes after the surface confirms each
    /// operation, so on error it still describes exactly the nodes that
    /// exist; the next update converges from there.
    ///
    /// # Errors
    ///
    /// Returns the first [`SurfaceError`] reported by the surface.
    pub fn apply<S: RenderSurface>(
        &self,
        plan: &UpdatePlan,
        index: &EventIndex,
        visible: &mut VisibleSet<S::Handle>,
        surface: &mut S,
    ) -> Result<UpdateOutcome, SurfaceError> {
        let mut outcome = UpdateOutcome::default();

        for id in &plan.to_unmount {
            if let Some(node) = visible.nodes.get(id) {
                surface.unmount(&node.handle)?;
                visible.nodes.remove(id);
                outcome.unmounted = outcome.unmounted.saturating_add(1);
            }
        }

        for &position in &plan.to_mount {
            let Some(event) = index.get(position) else {
                continue;
            };
            if visible.contains(event.id) {
                continue;
            }
            let handle = surface.mount(&event.descriptor(self.orientation))?;
            visible
                .nodes
                .insert(event.id, VisibleNode { handle, position });
            outcome.mounted = outcome.mounted.saturating_add(1);
        }

        Ok(outcome)
    }

    /// Plan and apply in one step.
    ///
    /// # Errors
    ///
    /// Returns the first [`SurfaceError`] reported by the surface.
    pub fn update<S: RenderSurface>(
        &self,
        index: &EventIndex,
        visible: &mut VisibleSet<S::Handle>,
        surface: &mut S,
        window: ScrollWindow,
    ) -> Result<UpdateOutcome, SurfaceError> {
        let plan = self.plan(index, visible, window);
        if plan.is_empty() {
            return Ok(UpdateOutcome::default());
        }
        let outcome = self.apply(&plan, index, visible, surface)?;
        debug!(
            low = window.low,
            high = window.high,
            mounted = outcome.mounted,
            unmounted = outcome.unmounted,
            visible = visible.len(),
            "Visible set updated"
        );
        Ok(outcome)
    }
}
