//! Seat selection rules
//!
//! Pure logic deciding which tables a party may pick and whether the current
//! pick lets the wizard leave the seating step. Only one table is ever
//! selected; clicking another table replaces the selection, clicking the
//! selected table clears it.
//!
//! | Rule | Effect |
//! |------|--------|
//! | stage / piano | never selectable |
//! | booked or unavailable | not selectable |
//! | group table, party > 10 | not selectable |
//! | group table, party == 2 | not selectable |
//! | 2-seat standard/quiet table, party >= 4 | not selectable |
//! | VIP | party rules and capacity checks skipped |
//! | other category than the selected table | shown as unavailable |

use shared::models::{SelectedTable, Table, TableCategory};
use thiserror::Error;

/// Largest party a group table accepts
pub const GROUP_MAX_PARTY: u32 = 10;

/// Party size a group table is too large for
pub const GROUP_MIN_PARTY_EXCLUSIVE: u32 = 2;

/// Capacity of the small standard/quiet tables
pub const SMALL_TABLE_CAPACITY: i32 = 2;

/// Party size from which small tables are blocked
pub const SMALL_TABLE_BLOCKED_FROM: u32 = 4;

/// Why a table cannot be picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ineligible {
    #[error("Decorative table")]
    Decorative,
    #[error("Table is booked or unavailable")]
    Unavailable,
    #[error("Group tables seat at most 10 guests")]
    PartyTooLarge,
    #[error("Group tables are not offered to parties of two")]
    PartyTooSmall,
    #[error("Table is too small for this party")]
    TableTooSmall,
    #[error("Another table category is already selected")]
    OtherCategoryActive,
    #[error("Table not found")]
    UnknownTable,
}

/// Blocking warning shown when leaving the seating step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatWarning {
    #[error("Please select a seat before continuing.")]
    NoSeatSelected,

    #[error("This seat is not suitable for your party. Please choose a different seat.")]
    ChooseDifferentSeat,

    #[error("The selected table seats {capacity} but your party has {party} guests.")]
    InsufficientCapacity { capacity: i32, party: u32 },

    #[error("The selected table is too large for your party (up to {max} seats). Please choose a smaller table.")]
    OverCapacity { capacity: i32, max: i64 },
}

/// Result of clicking a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected {
        table: SelectedTable,
        replaced: Option<SelectedTable>,
    },
    Deselected(SelectedTable),
}

/// Party-size rules per category. VIP is exempt.
pub fn party_rule_violation(table: &Table, party: u32) -> Option<Ineligible> {
    match table.category()? {
        TableCategory::Vip => None,
        TableCategory::Group if party > GROUP_MAX_PARTY => Some(Ineligible::PartyTooLarge),
        TableCategory::Group if party == GROUP_MIN_PARTY_EXCLUSIVE => {
            Some(Ineligible::PartyTooSmall)
        }
        TableCategory::Standard | TableCategory::Quiet
            if table.capacity == SMALL_TABLE_CAPACITY && party >= SMALL_TABLE_BLOCKED_FROM =>
        {
            Some(Ineligible::TableTooSmall)
        }
        _ => None,
    }
}

/// Table list evaluated for one party size
#[derive(Debug, Clone, Copy)]
pub struct SeatPlan<'a> {
    tables: &'a [Table],
    party: u32,
}

impl<'a> SeatPlan<'a> {
    pub fn new(tables: &'a [Table], party: u32) -> Self {
        Self { tables, party }
    }

    pub fn find(&self, code: &str) -> Option<&'a Table> {
        self.tables.iter().find(|t| t.code == code)
    }

    /// Whether `table` may be clicked given the current selection
    pub fn eligibility(
        &self,
        table: &Table,
        selected: Option<&SelectedTable>,
    ) -> Result<(), Ineligible> {
        let category = table.category().ok_or(Ineligible::Decorative)?;
        if !table.is_effectively_available() {
            return Err(Ineligible::Unavailable);
        }
        if let Some(violation) = party_rule_violation(table, self.party) {
            return Err(violation);
        }
        match selected {
            Some(sel) if sel.category != category => Err(Ineligible::OtherCategoryActive),
            _ => Ok(()),
        }
    }

    /// Every table with its eligibility, for rendering the floor plan
    pub fn candidates(
        &self,
        selected: Option<&SelectedTable>,
    ) -> Vec<(&'a Table, Result<(), Ineligible>)> {
        self.tables
            .iter()
            .map(|t| {
                let eligibility = if selected.is_some_and(|s| s.code == t.code) {
                    Ok(())
                } else {
                    self.eligibility(t, selected)
                };
                (t, eligibility)
            })
            .collect()
    }

    /// Click on a table: deselect it if it is the current pick, otherwise make
    /// it the only selection.
    pub fn toggle(
        &self,
        code: &str,
        selected: Option<&SelectedTable>,
    ) -> Result<SelectionChange, Ineligible> {
        if let Some(current) = selected
            && current.code == code
        {
            return Ok(SelectionChange::Deselected(current.clone()));
        }

        let table = self.find(code).ok_or(Ineligible::UnknownTable)?;
        // The category lock is a rendering hint; an explicit click replaces.
        self.eligibility(table, None)?;
        let table = SelectedTable::from_table(table).ok_or(Ineligible::Decorative)?;
        Ok(SelectionChange::Selected {
            table,
            replaced: selected.cloned(),
        })
    }

    /// Gate for leaving the seating step
    pub fn validate_advance(&self, selected: Option<&SelectedTable>) -> Result<(), SeatWarning> {
        let selected = selected.ok_or(SeatWarning::NoSeatSelected)?;
        let table = self
            .find(&selected.code)
            .ok_or(SeatWarning::ChooseDifferentSeat)?;
        let category = table.category().ok_or(SeatWarning::ChooseDifferentSeat)?;

        if category == TableCategory::Vip {
            return Ok(());
        }
        if party_rule_violation(table, self.party).is_some() {
            return Err(SeatWarning::ChooseDifferentSeat);
        }

        let capacity = table.capacity;
        if i64::from(capacity) < i64::from(self.party) {
            return Err(SeatWarning::InsufficientCapacity {
                capacity,
                party: self.party,
            });
        }

        let smallest = self
            .tables
            .iter()
            .filter(|t| t.category() == Some(category))
            .map(|t| t.capacity)
            .min()
            .unwrap_or(capacity);
        let max = i64::from(self.party) + i64::from(smallest);
        if i64::from(capacity) > max {
            return Err(SeatWarning::OverCapacity { capacity, max });
        }

        Ok(())
    }
}
