#![forbid(unsafe_code)]

//! Core: geometry, time points, frame triggers, and input events.

pub mod atomic;
pub mod cursor;
pub mod event;
pub mod geometry;
pub mod keybinding;
pub mod logging;
pub mod time;
pub mod trigger;

#[cfg(feature = "tracing")]
pub use logging::{debug, error, trace, warn};
