//! Shared type definitions for the Chronoscroll timeline engine.
//!
//! These types cross the boundary between the engine and the rendering
//! surface. They flow to `TypeScript` via `ts-rs` so the page script can
//! consume mount instructions and visual states without hand-written typings.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for event identity
//! - [`enums`] -- Layout, activation policy, date form and label tier enums
//! - [`structs`] -- Dataset records, node descriptors and visual states

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActivationPolicy, DateForm, DisplayTier, Orientation, Side};
pub use ids::EventId;
pub use structs::{NodeDescriptor, TimelineRecord, VisualState};
