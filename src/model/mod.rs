//! Database models module
//!
//! Row structs for the per-source, supply, canonical and registry tables
//! live in models.rs; table.rs holds the generic table handle.

mod models;
mod table;

pub use models::*;

pub use table::Table;
