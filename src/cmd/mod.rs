//! Command implementations for the blinkwatch CLI.

pub mod replay;

pub use replay::ReplayArgs;
