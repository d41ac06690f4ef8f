// Core data models for Sheetdash
// These structs represent a loaded source: its schema and its rows

pub mod row;
pub mod schema;
pub mod status;

pub use row::*;
pub use schema::*;
pub use status::*;
