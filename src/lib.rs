//! Blockfall (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package re-exports
//! them as `blockfall::{core,input,types}` and hosts the headless runner binary.

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_types as types;
