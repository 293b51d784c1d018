//! Logarithmic mapping between years before present and axis coordinates.
//!
//! A linear mapping would either crush recorded history into a sliver or
//! make the deep past impossibly long. The axis instead places time on a
//! natural-log scale:
//!
//! ```text
//! extent     = ln(oldest + 1) * zoom
//! to_axis(t) = extent - ln(t + 1) * zoom          (t > -1)
//! to_time(c) = exp((extent - c) / zoom) - 1
//! ```
//!
//! The oldest event sits at coordinate `0` and the present at `extent`.
//! Future times (`t <= -1`) have no logarithm and are clamped to `extent`.

/// Errors that can occur when constructing an axis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AxisError {
    /// The zoom factor is zero, negative, or not finite.
    #[error("zoom factor must be positive and finite, got {zoom_factor}")]
    InvalidZoom {
        /// The rejected zoom factor.
        zoom_factor: f64,
    },

    /// The oldest time value is not finite.
    #[error("oldest time value must be finite, got {oldest}")]
    NonFiniteOldest {
        /// The rejected time value.
        oldest: f64,
    },
}

/// Bidirectional logarithmic time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonlinearTimeAxis {
    /// Axis units per natural-log unit of time.
    zoom_factor: f64,
    /// Coordinate of the present (and of every clamped future time).
    extent: f64,
}

impl NonlinearTimeAxis {
    /// Build an axis spanning from `oldest` years ago to the present.
    ///
    /// An `oldest` value at or below zero yields a zero-length axis.
    ///
    /// # Errors
    ///
    /// Returns [`AxisError`] if `zoom_factor` is not a positive finite number
    /// or `oldest` is not finite.
    pub fn new(oldest: f64, zoom_factor: f64) -> Result<Self, AxisError> {
        if !zoom_factor.is_finite() || zoom_factor <= 0.0 {
            return Err(AxisError::InvalidZoom { zoom_factor });
        }
        if !oldest.is_finite() {
            return Err(AxisError::NonFiniteOldest { oldest });
        }
        let extent = oldest.max(0.0).ln_1p() * zoom_factor;
        Ok(Self {
            zoom_factor,
            extent,
        })
    }

    /// Total axis length from the oldest event to the present.
    pub const fn extent(&self) -> f64 {
        self.extent
    }

    /// The configured zoom factor.
    pub const fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Map years before present to an axis coordinate.
    ///
    /// Times at or beyond one year in the future, and non-finite input, map
    /// to [`extent`](Self::extent).
    pub fn to_axis(&self, years_before_present: f64) -> f64 {
        if years_before_present.is_nan() || years_before_present <= -1.0 {
            return self.extent;
        }
        if years_before_present.is_infinite() {
            return self.extent;
        }
        self.extent - years_before_present.ln_1p() * self.zoom_factor
    }

    /// Map an axis coordinate back to years before present.
    ///
    /// The result is always greater than `-1` and saturates at `f64::MAX`
    /// for coordinates far before the oldest event.
    pub fn to_time(&self, coordinate: f64) -> f64 {
        let years = ((self.extent - coordinate) / self.zoom_factor).exp_m1();
        if years.is_nan() {
            return 0.0;
        }
        years.min(f64::MAX)
    }
}
