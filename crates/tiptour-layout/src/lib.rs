#![forbid(unsafe_code)]

//! Layout for TipTour: where the bubble, arrow and overlay cutout go.
//!
//! Everything here is pure computation over [`tiptour_core::geometry`]
//! types. The runtime measures content, calls [`compute_anchor`] and hands
//! the result to a presenter.

pub mod anchor;
pub mod metrics;

pub use anchor::{AnchorGeometry, AnchorRequest, AnchorStyle, Cutout, Side, compute_anchor};
pub use metrics::{MonospaceMetrics, display_width, wrap_text};
