//! Proximity-driven activation of visible nodes.
//!
//! Each tick, every mounted node is scored by its distance from the focus
//! line. Inside the activation radius a node is fully opaque and its scale
//! falls off linearly from `base_scale + scale_range` at the center to
//! `base_scale` at the radius edge. At or beyond the radius it is hidden at
//! `inactive_scale`. The comparison is strict: a node exactly one radius away
//! is inactive.
//!
//! [`ActivationPolicy::NearestOnly`] narrows this to the single in-radius
//! node nearest the center; every other node is treated as out of range.

use chronoscroll_types::{ActivationPolicy, EventId, VisualState};

use crate::config::ActivationConfig;
use crate::index::EventIndex;
use crate::surface::{RenderSurface, SurfaceError};
use crate::virtualizer::VisibleSet;

/// Visual state computed for one visible node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    /// Event identity.
    pub id: EventId,
    /// Position of the event in the index.
    pub position: usize,
    /// Absolute distance from the focus line.
    pub distance: f64,
    /// The resulting visual state.
    pub state: VisualState,
}

/// Counts from one activation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationSummary {
    /// Nodes that received a visual state.
    pub updated: usize,
    /// Nodes that ended up active.
    pub active: usize,
}

/// Computes and applies prominence for visible nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityActivationEngine {
    config: ActivationConfig,
}

impl ProximityActivationEngine {
    /// Create an engine with the given curve and policy.
    pub const fn new(config: ActivationConfig) -> Self {
        Self { config }
    }

    /// The policy in force.
    pub const fn policy(&self) -> ActivationPolicy {
        self.config.policy
    }

    /// Visual state for a node `distance` away from the center, ignoring
    /// policy.
    pub fn state_for_distance(&self, distance: f64, radius: f64) -> VisualState {
        if distance < radius {
            let proximity = distance / radius;
            let scale = (1.0 - proximity).mul_add(self.config.scale_range, self.config.base_scale);
            VisualState::active(scale)
        } else {
            VisualState::inactive(self.config.inactive_scale)
        }
    }

    /// Compute states for every visible node, ordered by index position.
    pub fn compute<H>(
        &self,
        index: &EventIndex,
        visible: &VisibleSet<H>,
        center: f64,
        radius: f64,
    ) -> Vec<Activation> {
        let mut scored: Vec<(EventId, usize, f64)> = visible
            .iter()
            .filter_map(|(id, node)| {
                index
                    .get(node.position)
                    .map(|event| (*id, node.position, (center - event.axis_coordinate).abs()))
            })
            .collect();
        scored.sort_by_key(|&(_, position, _)| position);

        let focus = match self.config.policy {
            ActivationPolicy::AllInRadius => None,
            ActivationPolicy::NearestOnly => scored
                .iter()
                .filter(|&&(_, _, distance)| distance < radius)
                .min_by(|a, b| a.2.total_cmp(&b.2).then(a.1.cmp(&b.1)))
                .map(|&(id, _, _)| id),
        };

        scored
            .into_iter()
            .map(|(id, position, distance)| {
                let state = match self.config.policy {
                    ActivationPolicy::AllInRadius => self.state_for_distance(distance, radius),
                    ActivationPolicy::NearestOnly if focus == Some(id) => {
                        self.state_for_distance(distance, radius)
                    }
                    ActivationPolicy::NearestOnly => {
                        VisualState::inactive(self.config.inactive_scale)
                    }
                };
                Activation {
                    id,
                    position,
                    distance,
                    state,
                }
            })
            .collect()
    }

    /// Compute states and push them to the surface.
    ///
    /// # Errors
    ///
    /// Returns the first [`SurfaceError`] reported by the surface.
    pub fn activate<S: RenderSurface>(
        &self,
        index: &EventIndex,
        visible: &VisibleSet<S::Handle>,
        surface: &mut S,
        center: f64,
        radius: f64,
    ) -> Result<ActivationSummary, SurfaceError> {
        let mut summary = ActivationSummary::default();
        for activation in self.compute(index, visible, center, radius) {
            if let Some(node) = visible.get(activation.id) {
                surface.apply_visual(&node.handle, &activation.state)?;
                summary.updated = summary.updated.saturating_add(1);
                if activation.state.is_active {
                    summary.active = summary.active.saturating_add(1);
                }
            }
        }
        Ok(summary)
    }
}
