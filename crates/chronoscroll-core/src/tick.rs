//! The per-notification pass that keeps the surface in step with the viewport.
//!
//! [`TimelineDriver`] owns the [`EventIndex`], the [`VisibleSet`] and the
//! surface. Startup runs once:
//!
//! 1. **Readiness** -- the surface must expose every required element.
//! 2. **Index** -- parse every date, map it onto the axis, and sort.
//! 3. **Extent** -- size the scrollable region to the axis (or to any longer
//!    supplementary content) plus one viewport.
//! 4. **Initial pass** -- a full tick at offset 0, the start of history.
//!
//! Every scroll or resize notification then runs one synchronous tick:
//!
//! 1. **Virtualize** -- mount and unmount so that exactly the events inside
//!    the buffered window are live.
//! 2. **Label** -- map the viewport center back to a time and format it.
//! 3. **Activate** -- assign each live node its visual state from its
//!    distance to the center.
//!
//! Notifications are processed in delivery order with no coalescing.

use chronoscroll_types::TimelineRecord;
use serde::Serialize;
use tracing::{debug, info};

use crate::activation::ProximityActivationEngine;
use crate::calendar::{Calendar, CalendarError};
use crate::config::TimelineConfig;
use crate::date_parse::DateParser;
use crate::index::{EventIndex, IndexError};
use crate::label;
use crate::surface::{RenderSurface, SurfaceError};
use crate::virtualizer::{ScrollWindow, ViewportVirtualizer, VisibleSet};

/// Errors that can occur during startup or a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The configured calendar year is unusable.
    #[error("calendar error: {source}")]
    Calendar {
        /// The underlying calendar error.
        #[from]
        source: CalendarError,
    },

    /// The event index could not be built.
    #[error("index error: {source}")]
    Index {
        /// The underlying index error.
        #[from]
        source: IndexError,
    },

    /// The rendering surface failed.
    #[error("surface error: {source}")]
    Surface {
        /// The underlying surface error.
        #[from]
        source: SurfaceError,
    },

    /// The viewport has a non-finite offset or a negative length.
    #[error("invalid viewport: offset {offset}, length {length}")]
    InvalidViewport {
        /// The rejected offset.
        offset: f64,
        /// The rejected length.
        length: f64,
    },
}

/// Scroll position and size of the visible region, in axis units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Distance scrolled from the start of the axis.
    pub offset: f64,
    /// Visible length along the scroll dimension.
    pub length: f64,
}

impl Viewport {
    /// A viewport at `offset` of the given `length`.
    pub const fn new(offset: f64, length: f64) -> Self {
        Self { offset, length }
    }

    fn validate(self) -> Result<Self, TickError> {
        if self.offset.is_finite() && self.length.is_finite() && self.length >= 0.0 {
            Ok(self)
        } else {
            Err(TickError::InvalidViewport {
                offset: self.offset,
                length: self.length,
            })
        }
    }
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// The tick number, starting at 0 for the initial pass.
    pub tick: u64,
    /// The viewport this tick was run for.
    pub viewport: Viewport,
    /// Lower bound of the materialization window.
    pub window_low: f64,
    /// Upper bound of the materialization window.
    pub window_high: f64,
    /// Nodes created this tick.
    pub mounted: usize,
    /// Nodes destroyed this tick.
    pub unmounted: usize,
    /// Live nodes after the tick.
    pub visible: usize,
    /// Live nodes that are active after the tick.
    pub active: usize,
    /// Axis coordinate of the viewport center.
    pub center_coordinate: f64,
    /// Years before present at the viewport center.
    pub center_time: f64,
    /// Text written to the center label.
    pub label: String,
}

/// Owns the timeline state and runs ticks against a surface.
pub struct TimelineDriver<S: RenderSurface> {
    config: TimelineConfig,
    calendar: Calendar,
    index: EventIndex,
    visible: VisibleSet<S::Handle>,
    surface: S,
    virtualizer: ViewportVirtualizer,
    activation: ProximityActivationEngine,
    viewport: Viewport,
    scroll_extent: f64,
    next_tick: u64,
    last: Option<TickSummary>,
}

impl<S: RenderSurface> TimelineDriver<S> {
    /// Check the surface, build the index, size the scroll region and run
    /// the initial pass at offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Surface`] if a required element is missing,
    /// [`TickError::Index`] if the dataset is empty or has duplicate ids, and
    /// [`TickError::Calendar`] if the configured year is out of range.
    pub fn start(
        config: TimelineConfig,
        records: &[TimelineRecord],
        surface: S,
    ) -> Result<Self, TickError> {
        surface.check_ready()?;

        let calendar = Calendar::from_config(&config.calendar)?;
        let parser = DateParser::new(calendar);
        let index = EventIndex::build(records, &parser, config.axis.zoom_factor)?;

        let viewport = Viewport::new(0.0, config.viewport.initial_length).validate()?;
        let mut driver = Self {
            virtualizer: ViewportVirtualizer::new(config.axis.orientation),
            activation: ProximityActivationEngine::new(config.activation),
            config,
            calendar,
            index,
            visible: VisibleSet::new(),
            surface,
            viewport,
            scroll_extent: 0.0,
            next_tick: 0,
            last: None,
        };
        driver.update_scroll_extent(viewport.length)?;

        info!(
            events = driver.index.len(),
            unresolved = driver.index.unresolved().len(),
            current_year = calendar.current_year(),
            scroll_extent = driver.scroll_extent,
            "Timeline started"
        );

        driver.run_pass()?;
        Ok(driver)
    }

    /// Handle a scroll notification.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the viewport is invalid or the surface fails.
    pub fn on_scroll(&mut self, viewport: Viewport) -> Result<TickSummary, TickError> {
        self.viewport = viewport.validate()?;
        self.run_pass()
    }

    /// Handle a resize notification. Also recomputes the scroll extent.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the viewport is invalid or the surface fails.
    pub fn on_resize(&mut self, viewport: Viewport) -> Result<TickSummary, TickError> {
        let viewport = viewport.validate()?;
        self.update_scroll_extent(viewport.length)?;
        self.viewport = viewport;
        self.run_pass()
    }

    /// The event index.
    pub const fn index(&self) -> &EventIndex {
        &self.index
    }

    /// The currently materialized events.
    pub const fn visible(&self) -> &VisibleSet<S::Handle> {
        &self.visible
    }

    /// The surface being driven.
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, for hosts that adjust it between ticks.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Stop driving and hand the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The configuration in force.
    pub const fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// The calendar anchoring "now".
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// The most recent viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Total scrollable length last sent to the surface.
    pub const fn scroll_extent(&self) -> f64 {
        self.scroll_extent
    }

    /// Summary of the most recent tick.
    pub const fn last_summary(&self) -> Option<&TickSummary> {
        self.last.as_ref()
    }

    fn update_scroll_extent(&mut self, viewport_length: f64) -> Result<(), TickError> {
        let content = self.index.axis().extent().max(self.surface.content_extent());
        let extent = content + viewport_length;
        self.surface.set_scroll_extent(extent)?;
        self.scroll_extent = extent;
        Ok(())
    }

    fn run_pass(&mut self) -> Result<TickSummary, TickError> {
        let Viewport { offset, length } = self.viewport;
        let geometry = self.config.viewport;

        // Virtualize
        let window = ScrollWindow::around(offset, length, length * geometry.buffer_viewports);
        let outcome =
            self.virtualizer
                .update(&self.index, &mut self.visible, &mut self.surface, window)?;

        // Label
        let center = length.mul_add(geometry.center_ratio, offset);
        let radius = length * geometry.activation_radius_ratio;
        let center_time = self.index.axis().to_time(center);
        let label = label::format_display(center_time, self.calendar);
        self.surface.set_center_label(&label)?;

        // Activate
        let activation = self.activation.activate(
            &self.index,
            &self.visible,
            &mut self.surface,
            center,
            radius,
        )?;

        let tick = self.next_tick;
        self.next_tick = self.next_tick.saturating_add(1);

        let summary = TickSummary {
            tick,
            viewport: self.viewport,
            window_low: window.low,
            window_high: window.high,
            mounted: outcome.mounted,
            unmounted: outcome.unmounted,
            visible: self.visible.len(),
            active: activation.active,
            center_coordinate: center,
            center_time,
            label,
        };
        debug!(
            tick,
            offset,
            visible = summary.visible,
            active = summary.active,
            label = %summary.label,
            "Tick completed"
        );
        self.last = Some(summary.clone());
        Ok(summary)
    }
}
