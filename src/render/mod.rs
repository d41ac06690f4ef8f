//! Presentation model
//!
//! The renderer turns filtered rows into display rows without re-running any
//! detection or classification. Text and JSON output in [`crate::cli::output`]
//! are built from this model.

pub mod stats;
pub mod view;

pub use stats::*;
pub use view::*;
