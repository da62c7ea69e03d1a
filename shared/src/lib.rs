//! Shared types for the table booking client
//!
//! Data models and response envelopes exchanged with the reservation
//! backend.

pub mod models;
pub mod response;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    HoldRequest, MenuSelection, ReleaseRequest, Reservation, ReservationCreate, ReservationForm,
    ReservationStatus, SelectedTable, Table, TableCategory, TableHoldStatus, TableType,
};
pub use response::{ApiPayload, ApiResponse};
pub use types::Timestamp;
