//! Held-command input module (engine-facing).
//!
//! This crate is independent of any device or UI framework. A front end reports
//! presses and releases as [`crate::types::Command`]s and calls
//! [`RepeatHandler::update`] once per frame to collect auto-repeats.

pub mod repeat;

pub use blockfall_types as types;

pub use repeat::{HorizontalDirection, RepeatHandler, Repeats};
