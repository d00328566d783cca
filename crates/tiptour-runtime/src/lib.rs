#![forbid(unsafe_code)]

//! Runtime for TipTour: the tour controller and the seams it drives.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      TourController                           │
//! │   - sequence, current index, phase                            │
//! │   - emits Started / Shown / Dismissed / Completed             │
//! └──────────────────────────────────────────────────────────────┘
//!        │                    │                       │
//!        ▼                    ▼                       ▼
//! ┌───────────────┐  ┌──────────────────┐  ┌─────────────────────┐
//! │GeometryResolver│  │    Presenter     │  │  CompletionStore    │
//! │ target → Rect │  │ measure / render │  │ key → completed     │
//! └───────────────┘  └──────────────────┘  └─────────────────────┘
//! ```
//!
//! # Feature Gates
//!
//! - `tracing`: forward logging from core and layout internals.
//! - `serde`: `Serialize`/`Deserialize` for appearance types.
//! - `config`: [`config::TourConfig`] JSON loading.
//! - `state-persistence`: `FileCompletionStore`.

pub mod appearance;
pub mod completion;
#[cfg(feature = "config")]
pub mod config;
pub mod controller;
pub mod presenter;
pub mod simulator;
pub mod target;

pub use appearance::{AppearanceConfig, ButtonAppearance, ButtonLabels, ButtonMode, FontSpec};
#[cfg(feature = "state-persistence")]
pub use completion::FileCompletionStore;
pub use completion::{CompletionStore, MemoryCompletionStore, StoreError, StoreResult};
#[cfg(feature = "config")]
pub use config::{ConfigError, TourConfig};
pub use controller::{ListenerId, TourController, TourEvent, TourPhase};
pub use presenter::{ButtonState, Interaction, Presenter, StepPresentation};
pub use simulator::{RecordingPresenter, TourSimulator};
pub use target::{
    GeometryResolver, ResolveError, StaticResolver, TargetHandle, TargetLookup, TargetRef,
    TooltipItem,
};
