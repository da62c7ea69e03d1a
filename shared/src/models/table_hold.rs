//! Table Hold Model
//!
//! A hold is a transient, unconfirmed claim on a table for one reservation
//! slot. The backend owns holds; clients only create and release them.

use serde::{Deserialize, Serialize};

/// Hold payload for `POST /table-reservations/hold`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldRequest {
    pub table_code: String,
    #[serde(rename = "heldBy", default, skip_serializing_if = "Option::is_none")]
    pub held_by: Option<String>,
    pub date: String,
    pub time: String,
}

/// Release payload for `POST /table-reservations/release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRequest {
    pub table_code: String,
}

impl ReleaseRequest {
    pub fn new(table_code: impl Into<String>) -> Self {
        Self {
            table_code: table_code.into(),
        }
    }
}

/// Server-side state of a table for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldState {
    Held,
    Booked,
    Available,
    #[serde(other)]
    Unknown,
}

/// Entry of `GET /table-reservations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHoldStatus {
    pub table_code: String,
    #[serde(rename = "heldBy", default)]
    pub held_by: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default = "default_state")]
    pub status: HoldState,
}

fn default_state() -> HoldState {
    HoldState::Held
}
