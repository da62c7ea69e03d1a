//! Table endpoints over HTTP

use async_trait::async_trait;
use shared::models::{HoldRequest, ReleaseRequest, Table, TableHoldStatus};

use super::TableApi;
use crate::{ClientResult, HttpClient};

#[async_trait]
impl TableApi for HttpClient {
    async fn fetch_tables(&self) -> ClientResult<Vec<Table>> {
        self.get("/tables").await
    }

    async fn tables_by_datetime(&self, date: &str, time: &str) -> ClientResult<Vec<Table>> {
        self.get_with_query("/tables/by-datetime", &[("date", date), ("time", time)])
            .await
    }

    async fn hold(&self, request: &HoldRequest) -> ClientResult<()> {
        self.post_ack("/table-reservations/hold", request).await
    }

    async fn release(&self, request: &ReleaseRequest) -> ClientResult<()> {
        self.post_ack("/table-reservations/release", request).await
    }

    async fn list_hold_statuses(&self) -> ClientResult<Vec<TableHoldStatus>> {
        self.get("/table-reservations").await
    }
}
