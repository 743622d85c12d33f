//! The boundary to the upstream blink detector.
//!
//! Blink *detection* (camera capture, eye-landmark models) lives outside this
//! crate; this module only defines the interface through which a detector
//! feeds events into the engine, plus a stdin-backed implementation that keeps
//! the daemon runnable without any camera stack.

mod stdin;
pub mod traits;

pub use stdin::StdinBlinkSource;
pub use traits::{BlinkSource, SourceError};
