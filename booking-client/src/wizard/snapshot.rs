//! Wizard checkpointing
//!
//! The form and current step are written under [`SNAPSHOT_KEY`] after every
//! change. A single TTL decides whether a snapshot is still usable; within it
//! the snapshot is either offered for resuming (the customer typed something)
//! or restored silently (nothing worth asking about).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::Timestamp;
use shared::models::ReservationForm;

use super::WizardStep;
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key of the wizard snapshot
pub const SNAPSHOT_KEY: &str = "reservation-data";

/// Current snapshot schema. Bump when the layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted (form, step, timestamp) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub version: u32,
    pub form: ReservationForm,
    pub step: WizardStep,
    /// Unix milliseconds
    pub saved_at: Timestamp,
}

impl WizardSnapshot {
    pub fn new(form: ReservationForm, step: WizardStep, saved_at: Timestamp) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            form,
            step,
            saved_at,
        }
    }

    /// Age at `now`; a timestamp from the future counts as brand new
    pub fn age(&self, now: Timestamp) -> Duration {
        Duration::from_millis(now.saturating_sub(self.saved_at).max(0) as u64)
    }
}

/// What to do with the stored snapshot on startup
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreDecision {
    /// Nothing usable; start empty
    Empty,
    /// Fresh but without customer data; restore without asking
    Silent(WizardSnapshot),
    /// Fresh with customer data; ask "resume or restart?"
    Prompt(WizardSnapshot),
}

/// Snapshot persistence over a key-value store
pub struct SnapshotStore<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Overwrite the stored snapshot
    pub fn save(&self, snapshot: &WizardSnapshot) -> StorageResult<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        self.store.put(SNAPSHOT_KEY, &bytes)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(SNAPSHOT_KEY)
    }

    /// Read the stored snapshot and decide how to use it.
    ///
    /// Unreadable, outdated-schema and expired snapshots are deleted.
    pub fn load(&self, now: Timestamp) -> RestoreDecision {
        let bytes = match self.store.get(SNAPSHOT_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return RestoreDecision::Empty,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read wizard snapshot");
                return RestoreDecision::Empty;
            }
        };

        let snapshot = match Self::decode(&bytes) {
            Some(snapshot) => snapshot,
            None => {
                self.discard("unreadable");
                return RestoreDecision::Empty;
            }
        };

        if snapshot.age(now) > self.ttl {
            self.discard("expired");
            return RestoreDecision::Empty;
        }

        if snapshot.form.has_customer_data() {
            RestoreDecision::Prompt(snapshot)
        } else {
            RestoreDecision::Silent(snapshot)
        }
    }

    /// Check the schema version before decoding the full layout
    fn decode(bytes: &[u8]) -> Option<WizardSnapshot> {
        #[derive(Deserialize)]
        struct Versioned {
            version: Option<u32>,
        }

        let versioned: Versioned = serde_json::from_slice(bytes).ok()?;
        if versioned.version != Some(SNAPSHOT_VERSION) {
            tracing::debug!(version = ?versioned.version, "Snapshot schema mismatch");
            return None;
        }
        serde_json::from_slice(bytes).ok()
    }

    fn discard(&self, reason: &str) {
        tracing::info!(reason, "Discarding wizard snapshot");
        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "Failed to delete wizard snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use shared::models::MenuSelection;
    use std::sync::Arc;

    const T: Timestamp = 1_790_000_000_000;

    fn form_with_items() -> ReservationForm {
        ReservationForm {
            date: "2026-10-20".into(),
            time: "19:00".into(),
            number_of_people: 4,
            selected_items: vec![MenuSelection {
                dish_id: "d1".into(),
                name: "Pho".into(),
                price: 55000.0,
                quantity: 2,
                image: None,
                category: None,
                note: None,
            }],
            ..Default::default()
        }
    }

    fn store(ttl_secs: u64) -> (Arc<MemoryStorage>, SnapshotStore<Arc<MemoryStorage>>) {
        let raw = Arc::new(MemoryStorage::new());
        (raw.clone(), SnapshotStore::new(raw, Duration::from_secs(ttl_secs)))
    }

    #[test]
    fn test_one_minute_ttl() {
        let (_, snapshots) = store(60);
        let snapshot = WizardSnapshot::new(form_with_items(), WizardStep::Menu, T);

        snapshots.save(&snapshot).unwrap();
        assert_eq!(snapshots.load(T + 30_000), RestoreDecision::Prompt(snapshot.clone()));

        assert_eq!(snapshots.load(T + 90_000), RestoreDecision::Empty);
        // Expired snapshot is gone, even for a later look with a longer window
        assert_eq!(snapshots.load(T + 30_000), RestoreDecision::Empty);
    }

    #[test]
    fn test_one_hour_ttl() {
        let (_, snapshots) = store(3600);
        let snapshot = WizardSnapshot::new(form_with_items(), WizardStep::Menu, T);
        snapshots.save(&snapshot).unwrap();

        assert_eq!(snapshots.load(T + 90_000), RestoreDecision::Prompt(snapshot));
        assert_eq!(snapshots.load(T + 3_601_000), RestoreDecision::Empty);
    }

    #[test]
    fn test_no_customer_data_restores_silently() {
        let (_, snapshots) = store(3600);
        let form = ReservationForm {
            date: "2026-10-20".into(),
            ..Default::default()
        };
        let snapshot = WizardSnapshot::new(form, WizardStep::BasicInfo, T);
        snapshots.save(&snapshot).unwrap();
        assert_eq!(snapshots.load(T + 1_000), RestoreDecision::Silent(snapshot));
    }

    #[test]
    fn test_corrupt_and_old_schema_are_discarded() {
        let (raw, snapshots) = store(3600);

        raw.put(SNAPSHOT_KEY, b"{not json").unwrap();
        assert_eq!(snapshots.load(T), RestoreDecision::Empty);
        assert!(raw.get(SNAPSHOT_KEY).unwrap().is_none());

        // Layout of the unversioned snapshots: {formData, step, timestamp}
        raw.put(
            SNAPSHOT_KEY,
            br#"{"formData":{"full_name":"Lan"},"step":2,"timestamp":1790000000000}"#,
        )
        .unwrap();
        assert_eq!(snapshots.load(T), RestoreDecision::Empty);
        assert!(raw.get(SNAPSHOT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_step_is_stored_as_number() {
        let snapshot = WizardSnapshot::new(ReservationForm::default(), WizardStep::Review, T);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["step"], 4);
        assert_eq!(value["version"], SNAPSHOT_VERSION);
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let snapshot = WizardSnapshot::new(ReservationForm::default(), WizardStep::Seating, T);
        assert_eq!(snapshot.age(T - 5_000), Duration::ZERO);
    }
}
