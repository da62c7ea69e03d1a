//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table type as stored by the backend (桌台类型)
///
/// `Stage` and `Piano` are floor-plan decorations and can never be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Standard,
    Group,
    Vip,
    Quiet,
    Stage,
    Piano,
}

/// Bookable table category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableCategory {
    Standard,
    Group,
    Vip,
    Quiet,
}

impl TableType {
    /// Selection category, `None` for decorative types
    pub fn category(self) -> Option<TableCategory> {
        match self {
            TableType::Standard => Some(TableCategory::Standard),
            TableType::Group => Some(TableCategory::Group),
            TableType::Vip => Some(TableCategory::Vip),
            TableType::Quiet => Some(TableCategory::Quiet),
            TableType::Stage | TableType::Piano => None,
        }
    }

    pub fn is_decorative(self) -> bool {
        self.category().is_none()
    }
}

impl From<TableCategory> for TableType {
    fn from(category: TableCategory) -> Self {
        match category {
            TableCategory::Standard => TableType::Standard,
            TableCategory::Group => TableType::Group,
            TableCategory::Vip => TableType::Vip,
            TableCategory::Quiet => TableType::Quiet,
        }
    }
}

impl TableCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TableCategory::Standard => "standard",
            TableCategory::Group => "group",
            TableCategory::Vip => "vip",
            TableCategory::Quiet => "quiet",
        }
    }
}

impl std::fmt::Display for TableCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid coordinates on the floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePosition {
    pub row: i32,
    pub col: i32,
}

/// Dining table entity (桌台)
///
/// `is_available` alone is not authoritative: a table can be available in its
/// definition but booked for the requested slot. Use
/// [`Table::is_effectively_available`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(alias = "table_code")]
    pub code: String,
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub table_type: TableType,
    pub capacity: i32,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub position: Option<TablePosition>,
}

fn default_true() -> bool {
    true
}

impl Table {
    /// Create an available, unbooked table without floor-plan data
    pub fn new(code: impl Into<String>, table_type: TableType, capacity: i32) -> Self {
        Self {
            code: code.into(),
            id: None,
            table_type,
            capacity,
            is_available: true,
            is_booked: false,
            floor: None,
            zone: None,
            position: None,
        }
    }

    pub fn is_effectively_available(&self) -> bool {
        self.is_available && !self.is_booked
    }

    pub fn category(&self) -> Option<TableCategory> {
        self.table_type.category()
    }

    /// Name shown to the customer, e.g. "VIP V2"
    pub fn display_name(&self) -> String {
        let label = match self.table_type {
            TableType::Standard => "Table",
            TableType::Group => "Group table",
            TableType::Vip => "VIP",
            TableType::Quiet => "Quiet table",
            TableType::Stage => "Stage",
            TableType::Piano => "Piano",
        };
        format!("{} {}", label, self.code)
    }
}
