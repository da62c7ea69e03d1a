//! Table availability fetcher
//!
//! Keeps the last known table list for the seating step. Every refresh gets a
//! sequence number; a response that arrives after a newer refresh was issued
//! is dropped, so a slow request for an old date/time can never overwrite the
//! tables of the current slot.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use shared::models::Table;

use crate::ClientError;
use crate::api::TableApi;

/// Result of a refresh
#[derive(Debug)]
pub enum FetchOutcome {
    /// The table list was replaced
    Updated(usize),
    /// A newer refresh was issued while this one was in flight; result dropped
    Stale,
    /// The request failed; the previous list is kept
    Failed(ClientError),
}

impl FetchOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, FetchOutcome::Updated(_))
    }
}

/// Date/time slot the tables are requested for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

impl Slot {
    /// Both parts must be non-empty, otherwise the global list is used
    pub fn from_parts(date: &str, time: &str) -> Option<Self> {
        if date.trim().is_empty() || time.trim().is_empty() {
            return None;
        }
        Some(Self {
            date: date.to_string(),
            time: time.to_string(),
        })
    }
}

/// Table list holder with request sequencing
pub struct TableAvailability<A> {
    api: A,
    tables: RwLock<Vec<Table>>,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl<A: TableApi> TableAvailability<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tables: RwLock::new(Vec::new()),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch tables for `slot`, or the global definitions when `slot` is `None`
    pub async fn refresh(&self, slot: Option<&Slot>) -> FetchOutcome {
        let request_id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let result = match slot {
            Some(slot) => self.api.tables_by_datetime(&slot.date, &slot.time).await,
            None => self.api.fetch_tables().await,
        };

        match result {
            Ok(tables) => {
                let mut current = self.tables.write();
                // Compared under the write lock so two completions cannot interleave
                if request_id < self.issued.load(Ordering::SeqCst)
                    || request_id <= self.applied.load(Ordering::SeqCst)
                {
                    tracing::debug!(request_id, "Dropping superseded table list");
                    return FetchOutcome::Stale;
                }
                let count = tables.len();
                *current = tables;
                self.applied.store(request_id, Ordering::SeqCst);
                tracing::debug!(request_id, count, "Table list updated");
                FetchOutcome::Updated(count)
            }
            Err(e) => {
                tracing::warn!(
                    request_id,
                    error = %e,
                    "Failed to fetch tables, keeping previous list"
                );
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Snapshot of the current table list
    pub fn tables(&self) -> Vec<Table> {
        self.tables.read().clone()
    }

    pub fn find(&self, code: &str) -> Option<Table> {
        self.tables.read().iter().find(|t| t.code == code).cloned()
    }

    /// Replace the list directly (e.g. from a push notification)
    pub fn set_tables(&self, tables: Vec<Table>) {
        let request_id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        *self.tables.write() = tables;
        self.applied.store(request_id, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientResult;
    use async_trait::async_trait;
    use shared::models::{HoldRequest, ReleaseRequest, TableHoldStatus, TableType};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Answers `tables_by_datetime` with one table named after the date.
    /// Requests for `slow_date` block until `gate` is notified.
    struct SlotApi {
        slow_date: &'static str,
        gate: Arc<Notify>,
        fail: bool,
    }

    #[async_trait]
    impl TableApi for SlotApi {
        async fn fetch_tables(&self) -> ClientResult<Vec<Table>> {
            Ok(vec![Table::new("GLOBAL", TableType::Standard, 4)])
        }

        async fn tables_by_datetime(&self, date: &str, _time: &str) -> ClientResult<Vec<Table>> {
            if self.fail {
                return Err(ClientError::Internal("boom".into()));
            }
            if date == self.slow_date {
                self.gate.notified().await;
            }
            Ok(vec![Table::new(date, TableType::Standard, 4)])
        }

        async fn hold(&self, _request: &HoldRequest) -> ClientResult<()> {
            Ok(())
        }

        async fn release(&self, _request: &ReleaseRequest) -> ClientResult<()> {
            Ok(())
        }

        async fn list_hold_statuses(&self) -> ClientResult<Vec<TableHoldStatus>> {
            Ok(vec![])
        }
    }

    fn slot(date: &str) -> Slot {
        Slot::from_parts(date, "19:00").unwrap()
    }

    #[tokio::test]
    async fn test_global_list_without_slot() {
        let availability = TableAvailability::new(SlotApi {
            slow_date: "",
            gate: Arc::new(Notify::new()),
            fail: false,
        });
        assert!(availability.refresh(None).await.is_updated());
        assert_eq!(availability.tables()[0].code, "GLOBAL");
    }

    #[tokio::test]
    async fn test_superseded_response_is_dropped() {
        let gate = Arc::new(Notify::new());
        let availability = Arc::new(TableAvailability::new(SlotApi {
            slow_date: "2026-10-20",
            gate: gate.clone(),
            fail: false,
        }));

        let slow = {
            let availability = availability.clone();
            tokio::spawn(async move { availability.refresh(Some(&slot("2026-10-20"))).await })
        };
        // Let the slow request register before issuing the newer one
        tokio::task::yield_now().await;
        while availability.issued.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let fast = availability.refresh(Some(&slot("2026-10-21"))).await;
        assert!(fast.is_updated());

        gate.notify_one();
        let slow = slow.await.unwrap();
        assert!(matches!(slow, FetchOutcome::Stale));
        assert_eq!(availability.tables()[0].code, "2026-10-21");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_list() {
        let availability = TableAvailability::new(SlotApi {
            slow_date: "",
            gate: Arc::new(Notify::new()),
            fail: true,
        });
        availability.set_tables(vec![Table::new("S1", TableType::Standard, 4)]);

        let outcome = availability.refresh(Some(&slot("2026-10-20"))).await;
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(availability.tables().len(), 1);
        assert!(availability.find("S1").is_some());
    }

    #[test]
    fn test_slot_requires_both_parts() {
        assert!(Slot::from_parts("2026-10-20", "").is_none());
        assert!(Slot::from_parts(" ", "19:00").is_none());
        assert!(Slot::from_parts("2026-10-20", "19:00").is_some());
    }
}
