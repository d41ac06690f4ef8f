//! Sheetdash - a command-line dashboard over spreadsheet-backed task lists
//!
//! This library provides the core functionality for Sheetdash, including:
//! - Schema detection and row classification for loosely structured sheets
//! - Filter option building, filter parsing and evaluation
//! - A presentation model for the task table and status counters
//! - Row stores for the remote storage API and local JSON snapshots
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```no_run
//! use sheetdash::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod sources;
pub mod store;
