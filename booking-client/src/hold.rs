//! Table hold lifecycle
//!
//! Holds are advisory. The backend decides who gets the table when the
//! reservation is confirmed, so a failed hold or release is logged and
//! reported to the caller but never undoes the customer's selection.

use std::sync::Arc;

use shared::models::{HoldRequest, ReleaseRequest, TableHoldStatus};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::TableApi;
use crate::{ClientError, ClientResult};

/// What a hold/release call did
#[derive(Debug)]
pub enum HoldOutcome {
    Held(String),
    Released(String),
    /// Nothing to do (no table held, or the table is already held)
    Unchanged,
    Failed {
        table_code: String,
        error: ClientError,
    },
}

impl HoldOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, HoldOutcome::Failed { .. })
    }
}

/// At most one table held by this client session
pub struct TableHold<A: TableApi + 'static> {
    api: Arc<A>,
    session_id: String,
    held: Option<String>,
}

impl<A: TableApi + 'static> TableHold<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            session_id: Uuid::new_v4().to_string(),
            held: None,
        }
    }

    /// Identifier sent as `heldBy`
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Code of the table currently held, if any
    pub fn held(&self) -> Option<&str> {
        self.held.as_deref()
    }

    /// Hold `table_code` for the slot, releasing any other table first
    pub async fn hold(&mut self, table_code: &str, date: &str, time: &str) -> HoldOutcome {
        if self.held.as_deref() == Some(table_code) {
            return HoldOutcome::Unchanged;
        }
        if self.held.is_some() {
            self.release().await;
        }

        let request = HoldRequest {
            table_code: table_code.to_string(),
            held_by: Some(self.session_id.clone()),
            date: date.to_string(),
            time: time.to_string(),
        };
        match self.api.hold(&request).await {
            Ok(()) => {
                tracing::info!(table_code, date, time, "Table held");
                self.held = Some(table_code.to_string());
                HoldOutcome::Held(table_code.to_string())
            }
            Err(error) => {
                tracing::warn!(table_code, error = %error, "Failed to hold table");
                HoldOutcome::Failed {
                    table_code: table_code.to_string(),
                    error,
                }
            }
        }
    }

    /// Release the held table, if any
    pub async fn release(&mut self) -> HoldOutcome {
        let Some(table_code) = self.held.take() else {
            return HoldOutcome::Unchanged;
        };

        // Once asked to release we stop tracking the table even on failure;
        // the backend expires stale holds.
        match self.api.release(&ReleaseRequest::new(&table_code)).await {
            Ok(()) => {
                tracing::info!(table_code = %table_code, "Table released");
                HoldOutcome::Released(table_code)
            }
            Err(error) => {
                tracing::warn!(table_code = %table_code, error = %error, "Failed to release table");
                HoldOutcome::Failed { table_code, error }
            }
        }
    }

    /// Track a table held by an earlier session of this client (restored
    /// selection). No request is sent.
    pub fn adopt(&mut self, table_code: &str) {
        if self.held.is_none() {
            tracing::debug!(table_code, "Adopting restored table hold");
            self.held = Some(table_code.to_string());
        }
    }

    /// Stop tracking the held table without releasing it (the reservation
    /// now owns the table)
    pub fn commit(&mut self) -> Option<String> {
        self.held.take()
    }

    /// Fire-and-forget release for page unload / session end.
    ///
    /// Returns `None` when nothing is held or no tokio runtime is running.
    /// Calling it again after a release is a no-op.
    pub fn release_on_unload(&mut self) -> Option<JoinHandle<()>> {
        let table_code = self.held.take()?;
        spawn_release(self.api.clone(), table_code)
    }

    /// All current hold/booking statuses
    pub async fn list_statuses(&self) -> ClientResult<Vec<TableHoldStatus>> {
        self.api.list_hold_statuses().await
    }
}

impl<A: TableApi + 'static> Drop for TableHold<A> {
    fn drop(&mut self) {
        if let Some(table_code) = self.held.take() {
            let _ = spawn_release(self.api.clone(), table_code);
        }
    }
}

fn spawn_release<A: TableApi + 'static>(api: Arc<A>, table_code: String) -> Option<JoinHandle<()>> {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(table_code = %table_code, "No runtime available, hold left to expire");
        return None;
    };
    Some(handle.spawn(async move {
        if let Err(e) = api.release(&ReleaseRequest::new(&table_code)).await {
            tracing::warn!(table_code = %table_code, error = %e, "Unload release failed");
        } else {
            tracing::debug!(table_code = %table_code, "Unload release sent");
        }
    }))
}
