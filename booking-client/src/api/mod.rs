//! Backend endpoints used by the reservation flow
//!
//! The traits are the seam between the flow logic and the network:
//! [`crate::HttpClient`] implements them against the REST backend, tests
//! implement them in memory.

mod reservations;
mod tables;

use async_trait::async_trait;
use shared::models::{
    HoldRequest, ReleaseRequest, Reservation, ReservationCreate, ReservationLookup,
    ReservationStatus, Table, TableHoldStatus,
};

use crate::ClientResult;

/// Table listing and hold endpoints
#[async_trait]
pub trait TableApi: Send + Sync {
    /// `GET /tables`
    async fn fetch_tables(&self) -> ClientResult<Vec<Table>>;

    /// `GET /tables/by-datetime?date=&time=`
    async fn tables_by_datetime(&self, date: &str, time: &str) -> ClientResult<Vec<Table>>;

    /// `POST /table-reservations/hold`
    async fn hold(&self, request: &HoldRequest) -> ClientResult<()>;

    /// `POST /table-reservations/release`
    async fn release(&self, request: &ReleaseRequest) -> ClientResult<()>;

    /// `GET /table-reservations`
    async fn list_hold_statuses(&self) -> ClientResult<Vec<TableHoldStatus>>;
}

/// Reservation lifecycle endpoints (server-authoritative)
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// `POST /reservation/create`
    async fn create(&self, payload: &ReservationCreate) -> ClientResult<Reservation>;

    /// `GET /reservation/validate?reservationCode=&phone=`
    async fn validate(&self, lookup: &ReservationLookup) -> ClientResult<Reservation>;

    /// `PATCH /reservation/:id/confirm`
    async fn confirm(&self, id: &str) -> ClientResult<Reservation>;

    /// `PATCH /reservation/:id/status`
    async fn update_status(&self, id: &str, status: ReservationStatus)
    -> ClientResult<Reservation>;

    /// `PATCH /reservation/:id/cancel`
    async fn cancel(&self, id: &str) -> ClientResult<Reservation>;

    /// `PATCH /reservation/:id/restore`
    async fn restore(&self, id: &str) -> ClientResult<Reservation>;
}

#[async_trait]
impl<T: TableApi + ?Sized> TableApi for std::sync::Arc<T> {
    async fn fetch_tables(&self) -> ClientResult<Vec<Table>> {
        (**self).fetch_tables().await
    }

    async fn tables_by_datetime(&self, date: &str, time: &str) -> ClientResult<Vec<Table>> {
        (**self).tables_by_datetime(date, time).await
    }

    async fn hold(&self, request: &HoldRequest) -> ClientResult<()> {
        (**self).hold(request).await
    }

    async fn release(&self, request: &ReleaseRequest) -> ClientResult<()> {
        (**self).release(request).await
    }

    async fn list_hold_statuses(&self) -> ClientResult<Vec<TableHoldStatus>> {
        (**self).list_hold_statuses().await
    }
}
