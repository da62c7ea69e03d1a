//! Data models
//!
//! Shared between the reservation client and the backend API.
//! Field names follow the backend's JSON, which mixes snake_case bodies with
//! a few camelCase table fields.

pub mod dining_table;
pub mod reservation;
pub mod table_hold;

// Re-exports
pub use dining_table::*;
pub use reservation::*;
pub use table_hold::*;
