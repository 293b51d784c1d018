//! Rendering surface trait and headless implementation.
//!
//! The engine never touches markup directly. Every node it materializes,
//! every visual state it assigns and the center label it formats go through
//! a [`RenderSurface`]. A browser page implements the trait over its DOM; the
//! [`HeadlessSurface`] records everything in memory so that the tick pass
//! can be exercised end-to-end in tests and in the headless engine binary.

use std::collections::BTreeMap;

use chronoscroll_types::{EventId, NodeDescriptor, VisualState};
use serde::Serialize;

/// Element that hosts the timeline nodes and defines the scroll extent.
pub const TIMELINE_CONTAINER: &str = "timeline-container";

/// Element that displays the center-time label.
pub const CENTER_LABEL: &str = "center-label";

/// Elements a surface must provide before the timeline can start.
pub const REQUIRED_ELEMENTS: [&str; 2] = [TIMELINE_CONTAINER, CENTER_LABEL];

/// Errors reported by a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// A required element is absent. Fatal at startup.
    #[error("required surface element not found: {name}")]
    MissingElement {
        /// Name of the missing element.
        name: String,
    },

    /// The handle does not refer to a live node.
    #[error("unknown node handle: {handle}")]
    UnknownHandle {
        /// Printable form of the handle.
        handle: String,
    },

    /// The surface refused the operation.
    #[error("surface rejected operation: {message}")]
    Rejected {
        /// Description of the refusal.
        message: String,
    },
}

/// A display surface that can host timeline nodes.
///
/// Implementations own the nodes they create; the engine only holds the
/// opaque [`Handle`](RenderSurface::Handle) returned by
/// [`mount`](RenderSurface::mount).
pub trait RenderSurface {
    /// Opaque reference to a live node.
    type Handle: core::fmt::Debug;

    /// Verify every element in [`REQUIRED_ELEMENTS`] is present.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::MissingElement`] naming the first absent element.
    fn check_ready(&self) -> Result<(), SurfaceError>;

    /// Create a node for an event.
    fn mount(&mut self, node: &NodeDescriptor) -> Result<Self::Handle, SurfaceError>;

    /// Destroy a node previously returned by [`mount`](RenderSurface::mount).
    fn unmount(&mut self, handle: &Self::Handle) -> Result<(), SurfaceError>;

    /// Assign opacity, scale and active flag to a live node.
    fn apply_visual(&mut self, handle: &Self::Handle, state: &VisualState)
    -> Result<(), SurfaceError>;

    /// Set the total scrollable length of the page.
    fn set_scroll_extent(&mut self, extent: f64) -> Result<(), SurfaceError>;

    /// Replace the text of the center-time label.
    fn set_center_label(&mut self, label: &str) -> Result<(), SurfaceError>;

    /// Rendered length of non-virtualized supplementary content (for
    /// example an era grid), measured after it has been laid out.
    fn content_extent(&self) -> f64 {
        0.0
    }
}

/// Handle to a node on the [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeHandle(pub u64);

impl core::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// A node as recorded by the [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessNode {
    /// What was mounted.
    pub descriptor: NodeDescriptor,
    /// The last visual state applied, if any.
    pub visual: Option<VisualState>,
}

/// Serializable dump of a [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSnapshot {
    /// Total scrollable length.
    pub scroll_extent: f64,
    /// Current center label text.
    pub center_label: String,
    /// Live nodes, ordered by coordinate.
    pub nodes: Vec<HeadlessNode>,
}

/// In-memory surface that records every instruction it receives.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    next_handle: u64,
    nodes: BTreeMap<NodeHandle, HeadlessNode>,
    scroll_extent: f64,
    center_label: String,
    content_extent: f64,
    missing: Vec<String>,
    reject_mounts: bool,
    reject_scroll_extent: bool,
    mounts: u64,
    unmounts: u64,
}

impl HeadlessSurface {
    /// Create a surface with every required element present.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface lacking the named element.
    pub fn without(element: &str) -> Self {
        Self {
            missing: vec![element.to_owned()],
            ..Self::default()
        }
    }

    /// Report `extent` as the length of supplementary content.
    #[must_use]
    pub fn with_content_extent(mut self, extent: f64) -> Self {
        self.content_extent = extent;
        self
    }

    /// Make every subsequent mount fail (for exercising error paths).
    pub const fn set_reject_mounts(&mut self, reject: bool) {
        self.reject_mounts = reject;
    }

    /// Make every subsequent scroll-extent update fail.
    pub const fn set_reject_scroll_extent(&mut self, reject: bool) {
        self.reject_scroll_extent = reject;
    }

    /// Live nodes keyed by handle.
    pub const fn nodes(&self) -> &BTreeMap<NodeHandle, HeadlessNode> {
        &self.nodes
    }

    /// Find the live node for an event.
    pub fn node_for(&self, id: EventId) -> Option<&HeadlessNode> {
        self.nodes.values().find(|node| node.descriptor.id == id)
    }

    /// Last scroll extent set by the engine.
    pub const fn scroll_extent(&self) -> f64 {
        self.scroll_extent
    }

    /// Current center label text.
    pub fn center_label(&self) -> &str {
        &self.center_label
    }

    /// Total number of successful mounts.
    pub const fn mount_count(&self) -> u64 {
        self.mounts
    }

    /// Total number of successful unmounts.
    pub const fn unmount_count(&self) -> u64 {
        self.unmounts
    }

    /// Dump the surface, nodes ordered by coordinate.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let mut nodes: Vec<HeadlessNode> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.descriptor.coordinate.total_cmp(&b.descriptor.coordinate));
        SurfaceSnapshot {
            scroll_extent: self.scroll_extent,
            center_label: self.center_label.clone(),
            nodes,
        }
    }
}

impl RenderSurface for HeadlessSurface {
    type Handle = NodeHandle;

    fn check_ready(&self) -> Result<(), SurfaceError> {
        match REQUIRED_ELEMENTS
            .iter()
            .find(|name| self.missing.iter().any(|m| m == *name))
        {
            Some(name) => Err(SurfaceError::MissingElement {
                name: (*name).to_owned(),
            }),
            None => Ok(()),
        }
    }

    fn mount(&mut self, node: &NodeDescriptor) -> Result<Self::Handle, SurfaceError> {
        if self.reject_mounts {
            return Err(SurfaceError::Rejected {
                message: format!("mount of {} refused", node.id),
            });
        }
        let handle = NodeHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.nodes.insert(
            handle,
            HeadlessNode {
                descriptor: node.clone(),
                visual: None,
            },
        );
        self.mounts = self.mounts.saturating_add(1);
        Ok(handle)
    }

    fn unmount(&mut self, handle: &Self::Handle) -> Result<(), SurfaceError> {
        self.nodes
            .remove(handle)
            .ok_or_else(|| SurfaceError::UnknownHandle {
                handle: handle.to_string(),
            })?;
        self.unmounts = self.unmounts.saturating_add(1);
        Ok(())
    }

    fn apply_visual(
        &mut self,
        handle: &Self::Handle,
        state: &VisualState,
    ) -> Result<(), SurfaceError> {
        let node = self
            .nodes
            .get_mut(handle)
            .ok_or_else(|| SurfaceError::UnknownHandle {
                handle: handle.to_string(),
            })?;
        node.visual = Some(*state);
        Ok(())
    }

    fn set_scroll_extent(&mut self, extent: f64) -> Result<(), SurfaceError> {
        if self.reject_scroll_extent {
            return Err(SurfaceError::Rejected {
                message: format!("scroll extent {extent} refused"),
            });
        }
        self.scroll_extent = extent;
        Ok(())
    }

    fn set_center_label(&mut self, label: &str) -> Result<(), SurfaceError> {
        label.clone_into(&mut self.center_label);
        Ok(())
    }

    fn content_extent(&self) -> f64 {
        self.content_extent
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chronoscroll_types::{Orientation, Side};

    use super::*;

    fn descriptor(name: &str, coordinate: f64) -> NodeDescriptor {
        NodeDescriptor {
            id: EventId::from_description(name),
            description: name.to_owned(),
            era: "Test".to_owned(),
            era_class: "era-test".to_owned(),
            date_text: "1 CE".to_owned(),
            coordinate,
            orientation: Orientation::Vertical,
            side: Side::Right,
        }
    }

    #[test]
    fn ready_surface_passes_check() {
        assert!(HeadlessSurface::new().check_ready().is_ok());
    }

    #[test]
    fn missing_element_is_reported() {
        let surface = HeadlessSurface::without(CENTER_LABEL);
        assert_eq!(
            surface.check_ready(),
            Err(SurfaceError::MissingElement {
                name: CENTER_LABEL.to_owned()
            })
        );
    }

    #[test]
    fn mount_and_unmount_track_nodes() {
        let mut surface = HeadlessSurface::new();
        let a = surface.mount(&descriptor("a", 10.0)).unwrap();
        let b = surface.mount(&descriptor("b", 5.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(surface.nodes().len(), 2);

        surface.unmount(&a).unwrap();
        assert_eq!(surface.nodes().len(), 1);
        assert_eq!(surface.mount_count(), 2);
        assert_eq!(surface.unmount_count(), 1);
        assert!(surface.unmount(&a).is_err());
    }

    #[test]
    fn visual_state_is_recorded() {
        let mut surface = HeadlessSurface::new();
        let handle = surface.mount(&descriptor("a", 10.0)).unwrap();
        surface.apply_visual(&handle, &VisualState::active(1.2)).unwrap();
        let node = surface.node_for(EventId::from_description("a")).unwrap();
        assert_eq!(node.visual, Some(VisualState::active(1.2)));
    }

    #[test]
    fn snapshot_orders_by_coordinate() {
        let mut surface = HeadlessSurface::new();
        surface.mount(&descriptor("late", 90.0)).unwrap();
        surface.mount(&descriptor("early", 10.0)).unwrap();
        surface.set_center_label("1 CE").unwrap();
        let snapshot = surface.snapshot();
        let names: Vec<&str> = snapshot
            .nodes
            .iter()
            .map(|n| n.descriptor.description.as_str())
            .collect();
        assert_eq!(names, ["early", "late"]);
        assert_eq!(snapshot.center_label, "1 CE");
    }

    #[test]
    fn rejected_scroll_extent_keeps_previous_value() {
        let mut surface = HeadlessSurface::new();
        surface.set_scroll_extent(900.0).unwrap();
        surface.set_reject_scroll_extent(true);
        assert!(surface.set_scroll_extent(1700.0).is_err());
        assert!((surface.scroll_extent() - 900.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejected_mounts_fail() {
        let mut surface = HeadlessSurface::new();
        surface.set_reject_mounts(true);
        assert!(surface.mount(&descriptor("a", 1.0)).is_err());
        assert!(surface.nodes().is_empty());
    }
}
