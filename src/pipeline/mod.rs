//! Load pipeline: schema detection, row classification and the views derived
//! from the classified rows (filter options, visible columns).
//!
//! Every stage is a pure function over the rows of one load. The controller in
//! [`crate::app`] runs them in order and owns the results.

pub mod classify;
pub mod columns;
pub mod options;
pub mod schema;

pub use classify::*;
pub use columns::*;
pub use options::*;
pub use schema::*;
