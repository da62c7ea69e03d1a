//! Reservation flow
//!
//! Ties the wizard to the network: the table list for the chosen slot, the
//! hold around the seating choice, and the final submission.

use std::sync::Arc;

use shared::models::{MenuSelection, Reservation, ReservationForm, ReservationLookup, Table};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::api::{ReservationApi, TableApi};
use crate::availability::{FetchOutcome, Slot, TableAvailability};
use crate::hold::{HoldOutcome, TableHold};
use crate::seating::SelectionChange;
use crate::storage::KeyValueStore;
use crate::wizard::{ReservationWizard, WizardError, WizardStep};
use crate::{ClientConfig, ClientError};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type FlowResult<T> = Result<T, FlowError>;

/// One customer's reservation session
pub struct ReservationFlow<A, S>
where
    A: TableApi + ReservationApi + 'static,
{
    api: Arc<A>,
    wizard: ReservationWizard<S>,
    availability: TableAvailability<Arc<A>>,
    hold: TableHold<A>,
    deposit_rate: f64,
    reservation: Option<Reservation>,
}

impl<A, S> ReservationFlow<A, S>
where
    A: TableApi + ReservationApi + 'static,
    S: KeyValueStore,
{
    /// Start a session, restoring the wizard from `store`
    pub fn new(api: Arc<A>, store: S, config: &ClientConfig) -> Self {
        let mut flow = Self {
            availability: TableAvailability::new(api.clone()),
            hold: TableHold::new(api.clone()),
            api,
            wizard: ReservationWizard::restore(store, config.snapshot_ttl()),
            deposit_rate: config.deposit_rate,
            reservation: None,
        };
        flow.adopt_selected_table();
        flow
    }

    /// A restored selection is most likely still held from the previous page
    fn adopt_selected_table(&mut self) {
        if let Some(table) = &self.wizard.form().selected_table {
            self.hold.adopt(&table.code);
        }
    }

    pub fn wizard(&self) -> &ReservationWizard<S> {
        &self.wizard
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn held_table(&self) -> Option<&str> {
        self.hold.held()
    }

    /// Reservation accepted by the backend, once submitted
    pub fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }

    /// Accept the "resume?" prompt
    pub fn resume(&mut self) -> bool {
        let resumed = self.wizard.resume();
        if resumed {
            self.adopt_selected_table();
        }
        resumed
    }

    /// Start over, giving back any held table
    pub async fn restart(&mut self) {
        self.hold.release().await;
        self.wizard.restart();
        self.reservation = None;
    }

    /// Reload tables for the form's date/time (global list if either is missing)
    pub async fn refresh_tables(&self) -> FetchOutcome {
        let form = self.wizard.form();
        let slot = Slot::from_parts(&form.date, &form.time);
        self.availability.refresh(slot.as_ref()).await
    }

    pub fn tables(&self) -> Vec<Table> {
        self.availability.tables()
    }

    /// Edit the form and keep the hold in line with it.
    ///
    /// A new date or time drops the selected table: its hold was for the old
    /// slot and availability has to be checked again.
    pub async fn update_form(
        &mut self,
        edit: impl FnOnce(&mut ReservationForm),
    ) -> FlowResult<Option<HoldOutcome>> {
        let before = slot_key(self.wizard.form());
        self.wizard.update_form(edit)?;

        if slot_key(self.wizard.form()) != before
            && let Some(dropped) = self.wizard.clear_selection()?
        {
            tracing::info!(table_code = %dropped.code, "Slot changed, table deselected");
        }
        Ok(self.sync_hold().await)
    }

    /// Hold exactly the selected table, if any
    async fn sync_hold(&mut self) -> Option<HoldOutcome> {
        let form = self.wizard.form();
        match &form.selected_table {
            Some(table) if self.hold.held() == Some(table.code.as_str()) => None,
            Some(table) => {
                let (code, date, time) = (table.code.clone(), form.date.clone(), form.time.clone());
                Some(self.hold.hold(&code, &date, &time).await)
            }
            None if self.hold.held().is_some() => Some(self.hold.release().await),
            None => None,
        }
    }

    pub fn add_item(&mut self, item: MenuSelection) -> FlowResult<()> {
        Ok(self.wizard.add_item(item)?)
    }

    pub fn set_item_quantity(&mut self, dish_id: &str, quantity: u32) -> FlowResult<bool> {
        Ok(self.wizard.set_item_quantity(dish_id, quantity)?)
    }

    pub fn remove_item(&mut self, dish_id: &str) -> FlowResult<bool> {
        Ok(self.wizard.remove_item(dish_id)?)
    }

    /// Click on a table and move the hold along with the selection
    pub async fn toggle_table(
        &mut self,
        code: &str,
    ) -> FlowResult<(SelectionChange, HoldOutcome)> {
        let tables = self.availability.tables();
        let change = self.wizard.toggle_table(&tables, code)?;

        let outcome = match &change {
            SelectionChange::Selected { table, .. } => {
                let form = self.wizard.form();
                let (date, time) = (form.date.clone(), form.time.clone());
                self.hold.hold(&table.code, &date, &time).await
            }
            SelectionChange::Deselected(_) => self.hold.release().await,
        };
        Ok((change, outcome))
    }

    pub fn next(&mut self) -> FlowResult<WizardStep> {
        let tables = self.availability.tables();
        Ok(self.wizard.next(&tables)?)
    }

    pub fn back(&mut self) -> FlowResult<WizardStep> {
        Ok(self.wizard.back()?)
    }

    /// Submit the reservation from the deposit step
    pub async fn submit(&mut self) -> FlowResult<Reservation> {
        let tables = self.availability.tables();
        let payload = self.wizard.submission(&tables, self.deposit_rate)?;
        let reservation = self.api.create(&payload).await?;
        tracing::info!(
            reservation_code = %reservation.reservation_code,
            table_code = %payload.table_code,
            "Reservation created"
        );

        // The reservation now owns the table
        self.hold.commit();
        self.wizard.complete()?;
        self.reservation = Some(reservation.clone());
        Ok(reservation)
    }

    /// Look up a reservation for tracking
    pub async fn lookup(&self, reservation_code: &str, phone: &str) -> FlowResult<Reservation> {
        let lookup = ReservationLookup {
            reservation_code: reservation_code.trim().to_string(),
            phone: phone.trim().to_string(),
        };
        Ok(self.api.validate(&lookup).await?)
    }

    /// Page is going away: release the held table unless the wizard finished.
    ///
    /// Best effort; the returned task may be cut short by process exit.
    pub fn on_unload(&mut self) -> Option<JoinHandle<()>> {
        if self.wizard.is_terminal() || self.wizard.form().selected_table.is_none() {
            return None;
        }
        self.hold.release_on_unload()
    }
}

fn slot_key(form: &ReservationForm) -> (String, String) {
    (form.date.trim().to_string(), form.time.trim().to_string())
}
