//! Configuration, managed roots, and per-command context assembly.

pub mod context;
pub mod layout;
pub mod settings;

pub use layout::Layout;
pub use settings::*;
