//! Temporal coordinate engine and virtualized timeline renderer.
//!
//! This crate turns a dataset of free-form dated events into a scrollable
//! timeline spanning from the Big Bang to projected futures. Time is placed
//! on a logarithmic axis, only the events near the viewport are
//! materialized, and the events nearest the viewport center are emphasized.
//!
//! # Modules
//!
//! - [`activation`] -- Proximity-based prominence for live nodes.
//! - [`axis`] -- Logarithmic mapping between years and axis coordinates.
//! - [`calendar`] -- The current-year anchor used for CE/BCE arithmetic.
//! - [`config`] -- Configuration loading from `chronoscroll-config.yaml` into
//!   strongly-typed structs.
//! - [`date_parse`] -- Free-form date strings to years before present.
//! - [`index`] -- The sorted, axis-placed event index.
//! - [`label`] -- Tiered center-time label.
//! - [`surface`] -- [`RenderSurface`] trait and [`HeadlessSurface`].
//! - [`tick`] -- [`TimelineDriver`], startup and the per-notification pass.
//! - [`virtualizer`] -- Windowed mount/unmount of nodes.
//!
//! [`RenderSurface`]: surface::RenderSurface
//! [`HeadlessSurface`]: surface::HeadlessSurface
//! [`TimelineDriver`]: tick::TimelineDriver

pub mod activation;
pub mod axis;
pub mod calendar;
pub mod config;
pub mod date_parse;
pub mod index;
pub mod label;
pub mod surface;
pub mod tick;
pub mod virtualizer;
