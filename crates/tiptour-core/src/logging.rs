#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! This module provides re-exports of the trace-level macros when the `tracing`
//! feature is enabled. When the feature is disabled, no-op macros are provided
//! instead, so layout internals can log through `tiptour_core::trace!` either way.

#[cfg(feature = "tracing")]
pub use tracing::{trace, trace_span};

// When tracing is not enabled, provide no-op macros
#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op trace_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// A no-op span for when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Consume the span and enter it (does nothing).
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// A no-op span guard.
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

/// Environment variable read by [`init_json`] for the filter directives.
#[cfg(feature = "tracing-json")]
pub const LOG_ENV: &str = "TIPTOUR_LOG";

/// Install a global JSON subscriber.
///
/// Filter directives come from `TIPTOUR_LOG`, falling back to `default_filter`
/// (e.g. `"info,tiptour_runtime=debug"`). Returns an error if a global
/// subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json(default_filter: &str) -> Result<(), String> {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))
}

#[cfg(test)]
mod tests {
    #[test]
    fn trace_macros_accept_fields_either_way() {
        let side = "bottom";
        let _span = crate::trace_span!("compute_anchor", side = ?side).entered();
        crate::trace!(width = 12.0, "measured");
    }
}
