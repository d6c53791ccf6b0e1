#![forbid(unsafe_code)]

//! Event macros for widget code.
//!
//! Widgets log through `trellis_core::{debug, error, trace, warn}` so that a
//! widget crate only pulls in `tracing` when the `tracing` feature is on.
//! With the feature off the macros swallow their arguments; field syntax
//! such as `widget = %id` still parses because the arguments are never
//! expanded.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Widget-level detail: attach, removal, activation.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// A widget hook or backing failed.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Per-event routing detail.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Recoverable widget trouble.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
