//! Outcome shaping and the domain error taxonomy.

pub mod errors;
pub(crate) mod outcome;
