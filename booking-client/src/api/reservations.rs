//! Reservation endpoints over HTTP

use async_trait::async_trait;
use shared::models::{
    Reservation, ReservationCreate, ReservationLookup, ReservationStatus, ReservationStatusUpdate,
};
use urlencoding::encode;

use super::ReservationApi;
use crate::{ClientResult, HttpClient};

/// `/reservation/{id}/{action}` with the id as a single path segment
fn reservation_path(id: &str, action: &str) -> String {
    format!("/reservation/{}/{}", encode(id), action)
}

#[async_trait]
impl ReservationApi for HttpClient {
    async fn create(&self, payload: &ReservationCreate) -> ClientResult<Reservation> {
        self.post("/reservation/create", payload).await
    }

    async fn validate(&self, lookup: &ReservationLookup) -> ClientResult<Reservation> {
        self.get_with_query("/reservation/validate", lookup).await
    }

    async fn confirm(&self, id: &str) -> ClientResult<Reservation> {
        self.patch_empty(&reservation_path(id, "confirm")).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> ClientResult<Reservation> {
        self.patch(&reservation_path(id, "status"), &ReservationStatusUpdate { status })
            .await
    }

    async fn cancel(&self, id: &str) -> ClientResult<Reservation> {
        self.patch_empty(&reservation_path(id, "cancel")).await
    }

    async fn restore(&self, id: &str) -> ClientResult<Reservation> {
        self.patch_empty(&reservation_path(id, "restore")).await
    }
}
