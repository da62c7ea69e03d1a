//! Booking Client - client core for restaurant table reservations
//!
//! Talks to the reservation backend over HTTP and drives the six-step
//! reservation wizard: basic info, seating, menu, review, deposit, success.
//! The wizard checkpoints itself to local storage so an interrupted session
//! can be resumed.

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod flow;
pub mod hold;
pub mod http;
pub mod logger;
pub mod money;
pub mod seating;
pub mod storage;
pub mod wizard;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

pub use api::{ReservationApi, TableApi};
pub use availability::{FetchOutcome, Slot, TableAvailability};
pub use flow::{FlowError, FlowResult, ReservationFlow};
pub use hold::{HoldOutcome, TableHold};
pub use seating::{Ineligible, SeatPlan, SeatWarning, SelectionChange};
pub use storage::{KeyValueStore, MemoryStorage, RedbStorage, StorageError};
pub use wizard::{ReservationWizard, RestoreDecision, WizardError, WizardStep};

// Re-export shared types for convenience
pub use shared::models::{Reservation, ReservationForm, Table};
