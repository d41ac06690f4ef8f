//! Dashboard controller
//!
//! [`Dashboard`] owns the state of one session (selected source, schema,
//! classified rows, filter selection) and runs the pipeline on every load,
//! filter change and status update.

pub mod dashboard;
pub mod state;

pub use dashboard::*;
pub use state::*;
