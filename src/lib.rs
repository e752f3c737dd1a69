//! Blockfall (workspace facade crate).
//!
//! Re-exports the engine crates under short paths and hosts the headless
//! runner used by the default binary.

pub use blockfall_core as core;
pub use blockfall_types as types;

pub mod runner;
