#![forbid(unsafe_code)]

//! TipTour public facade crate.
//!
//! Re-exports the types a host needs to run a tooltip tour: items and
//! targets, the controller, the presenter and resolver seams, appearance
//! and completion storage. The [`prelude`] covers day-to-day use.
//!
//! ```
//! use tiptour::prelude::*;
//!
//! let resolver = StaticResolver::new(Rect::from_size(375.0, 800.0))
//!     .with_target("inbox", Rect::new(16.0, 60.0, 48.0, 24.0));
//! let mut sim = TourSimulator::new(resolver);
//! sim.controller_mut()
//!     .append(TooltipItem::new("inbox", "New messages land here", Side::Bottom));
//! sim.start();
//! sim.run_to_completion(4);
//! assert!(sim.is_completed());
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tiptour_core::color::Rgba;
pub use tiptour_core::geometry::{Point, Rect, Sides, Size};
#[cfg(feature = "tracing-json")]
pub use tiptour_core::logging::init_json;

// --- Layout re-exports -----------------------------------------------------

pub use tiptour_layout::anchor::{
    AnchorGeometry, AnchorRequest, AnchorStyle, Cutout, Side, compute_anchor,
};
pub use tiptour_layout::metrics::MonospaceMetrics;

// --- Runtime re-exports ----------------------------------------------------

pub use tiptour_runtime::{
    AppearanceConfig, ButtonAppearance, ButtonLabels, ButtonMode, ButtonState, CompletionStore,
    FontSpec, GeometryResolver, Interaction, ListenerId, MemoryCompletionStore, Presenter,
    RecordingPresenter, ResolveError, StaticResolver, StepPresentation, StoreError, TargetHandle,
    TargetLookup, TargetRef, TooltipItem, TourController, TourEvent, TourPhase, TourSimulator,
};

#[cfg(feature = "state-persistence")]
pub use tiptour_runtime::FileCompletionStore;

#[cfg(feature = "config")]
pub use tiptour_runtime::{ConfigError, TourConfig};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for TipTour hosts.
#[derive(Debug)]
pub enum Error {
    /// Completion store failure.
    Store(StoreError),
    /// A target or the root container could not be resolved.
    Resolve(ResolveError),
    /// Tour configuration could not be loaded.
    #[cfg(feature = "config")]
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Resolve(err) => write!(f, "{err}"),
            #[cfg(feature = "config")]
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Resolve(err) => Some(err),
            #[cfg(feature = "config")]
            Self::Config(err) => Some(err),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

#[cfg(feature = "config")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for TipTour APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AppearanceConfig, ButtonMode, CompletionStore, Error, GeometryResolver, Interaction,
        MemoryCompletionStore, Presenter, Rect, Result, Rgba, Side, Size, StaticResolver,
        StepPresentation, TargetRef, TooltipItem, TourController, TourEvent, TourSimulator,
    };

    #[cfg(feature = "config")]
    pub use crate::TourConfig;
    #[cfg(feature = "state-persistence")]
    pub use crate::FileCompletionStore;

    pub use crate::{core, layout, runtime};
}

pub use tiptour_core as core;
pub use tiptour_layout as layout;
pub use tiptour_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn store_error_converts_and_keeps_source() {
        let err: Error = StoreError::Corruption("bad".into()).into();
        assert!(matches!(err, Error::Store(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn resolve_error_display_passes_through() {
        let inner = ResolveError::NoRootContainer;
        let expected = inner.to_string();
        let err = Error::from(inner);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn question_mark_lifts_resolver_errors() {
        fn root(resolver: &StaticResolver) -> Result<Rect> {
            Ok(resolver.root_bounds()?)
        }
        assert!(matches!(
            root(&StaticResolver::without_root()),
            Err(Error::Resolve(ResolveError::NoRootContainer))
        ));
        let bounds = root(&StaticResolver::new(Rect::from_size(10.0, 20.0))).unwrap();
        assert_eq!(bounds, Rect::from_size(10.0, 20.0));
    }

    #[cfg(feature = "config")]
    #[test]
    fn config_error_converts() {
        let err: Error = TourConfig::from_json_str("nope").unwrap_err().into();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
