#![forbid(unsafe_code)]

//! Core: shared geometry, colour and logging for TipTour.

pub mod color;
pub mod geometry;
pub mod logging;

pub use color::Rgba;
pub use geometry::{Point, Rect, Sides, Size};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{trace, trace_span};
