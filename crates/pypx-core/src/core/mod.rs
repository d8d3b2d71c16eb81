//! Internal implementation modules for `pypx-core`.
//!
//! Callers go through the re-exports at the crate root.

pub mod config;
pub mod envs;
pub mod python;
pub mod runtime;
pub mod tooling;
