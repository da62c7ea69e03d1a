//! Reservation Model
//!
//! The wizard form the customer fills in step by step, and the payloads
//! exchanged with the reservation endpoints.

use serde::{Deserialize, Serialize};

use super::dining_table::{Table, TableCategory};

/// Table chosen in the seating step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTable {
    pub code: String,
    pub name: String,
    pub category: TableCategory,
}

impl SelectedTable {
    /// `None` for decorative tables, which cannot be selected
    pub fn from_table(table: &Table) -> Option<Self> {
        Some(Self {
            code: table.code.clone(),
            name: table.display_name(),
            category: table.category()?,
        })
    }
}

/// Pre-ordered dish (预点菜品)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSelection {
    pub dish_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Reservation wizard form
///
/// One mutable record shared by all wizard steps. Unknown or missing fields
/// fall back to defaults so older persisted forms still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationForm {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub number_of_people: u32,
    pub note: String,
    pub selected_table: Option<SelectedTable>,
    pub selected_items: Vec<MenuSelection>,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            email: String::new(),
            date: String::new(),
            time: String::new(),
            number_of_people: 1,
            note: String::new(),
            selected_table: None,
            selected_items: Vec::new(),
        }
    }
}

impl ReservationForm {
    /// Whether the customer has typed anything worth offering to resume
    pub fn has_customer_data(&self) -> bool {
        !self.full_name.trim().is_empty()
            || !self.phone.trim().is_empty()
            || !self.email.trim().is_empty()
            || !self.selected_items.is_empty()
    }

    /// Date and time, only when both are filled in
    pub fn slot(&self) -> Option<(&str, &str)> {
        if self.date.is_empty() || self.time.is_empty() {
            None
        } else {
            Some((self.date.as_str(), self.time.as_str()))
        }
    }
}

/// Reservation status (预订状态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Create payload for `POST /reservation/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date: String,
    pub time: String,
    pub number_of_people: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub table_code: String,
    pub table_category: TableCategory,
    pub selected_items: Vec<MenuSelection>,
    pub deposit: f64,
}

impl ReservationCreate {
    /// Build the create payload. `None` when no table has been selected.
    pub fn from_form(form: &ReservationForm, deposit: f64) -> Option<Self> {
        let table = form.selected_table.as_ref()?;
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Some(Self {
            full_name: form.full_name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            email: non_blank(&form.email),
            date: form.date.clone(),
            time: form.time.clone(),
            number_of_people: form.number_of_people,
            note: non_blank(&form.note),
            table_code: table.code.clone(),
            table_category: table.category,
            selected_items: form.selected_items.clone(),
            deposit,
        })
    }
}

/// Reservation entity as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "reservationCode")]
    pub reservation_code: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub number_of_people: u32,
    #[serde(default)]
    pub table_code: Option<String>,
    #[serde(default)]
    pub deposit: Option<f64>,
    pub status: ReservationStatus,
}

/// Query for `GET /reservation/validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationLookup {
    pub reservation_code: String,
    pub phone: String,
}

/// Body for `PATCH /reservation/:id/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: ReservationStatus,
}
