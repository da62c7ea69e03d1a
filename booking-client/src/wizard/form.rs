//! Form validation and menu editing
//!
//! Length limits follow what the backend stores; phone numbers are checked
//! on digits only so "+84 90-123-4567" and "0901234567" are both accepted.

use chrono::{NaiveDate, NaiveTime};
use shared::models::{MenuSelection, ReservationForm};
use thiserror::Error;

// ── Limits ──────────────────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Free-text notes
pub const MAX_NOTE_LEN: usize = 500;

/// Phone digits
pub const MIN_PHONE_DIGITS: usize = 9;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Party size
pub const MAX_PARTY_SIZE: u32 = 50;

/// Dish price, in currency units
pub const MAX_PRICE: f64 = 100_000_000.0;

/// Portions of one dish
pub const MAX_QUANTITY: u32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} must not be empty")]
    Required(&'static str),

    #[error("{field} is too long ({len} chars, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("Invalid time, expected HH:MM")]
    InvalidTime,

    #[error("Number of people must be between 1 and 50")]
    InvalidPartySize,

    #[error("Dish {0} must have a quantity between 1 and 9999")]
    InvalidQuantity(String),

    #[error("Dish {0} has an invalid price")]
    InvalidPrice(String),

    #[error("Order total is out of range")]
    TotalOutOfRange,
}

fn validate_required_text(value: &str, field: &'static str, max: usize) -> Result<(), FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Required(field));
    }
    validate_optional_text(value, field, max)
}

fn validate_optional_text(value: &str, field: &'static str, max: usize) -> Result<(), FormError> {
    let len = value.chars().count();
    if len > max {
        return Err(FormError::TooLong { field, len, max });
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), FormError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(FormError::Required("phone"));
    }
    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(FormError::InvalidPhone);
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(FormError::InvalidPhone);
    }
    Ok(())
}

/// Empty is allowed; email is optional
pub fn validate_email(email: &str) -> Result<(), FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    let Some((local, domain)) = email.split_once('@') else {
        return Err(FormError::InvalidEmail);
    };
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) || !domain_ok
    {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

/// Step 1 gate: contact details, slot and party size
pub fn validate_basic_info(form: &ReservationForm) -> Result<(), FormError> {
    validate_required_text(&form.full_name, "full_name", MAX_NAME_LEN)?;
    validate_phone(&form.phone)?;
    validate_email(&form.email)?;
    NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?;
    NaiveTime::parse_from_str(form.time.trim(), "%H:%M").map_err(|_| FormError::InvalidTime)?;
    if !(1..=MAX_PARTY_SIZE).contains(&form.number_of_people) {
        return Err(FormError::InvalidPartySize);
    }
    validate_optional_text(&form.note, "note", MAX_NOTE_LEN)?;
    Ok(())
}

/// Price must be finite and within `0..=MAX_PRICE`, quantity within `1..=MAX_QUANTITY`
pub fn validate_item(item: &MenuSelection) -> Result<(), FormError> {
    if !item.price.is_finite() || item.price < 0.0 || item.price > MAX_PRICE {
        return Err(FormError::InvalidPrice(item.dish_id.clone()));
    }
    if !(1..=MAX_QUANTITY).contains(&item.quantity) {
        return Err(FormError::InvalidQuantity(item.dish_id.clone()));
    }
    Ok(())
}

/// Step 3 gate: every pre-ordered dish is within bounds
pub fn validate_menu(items: &[MenuSelection]) -> Result<(), FormError> {
    items.iter().try_for_each(validate_item)
}

/// Add a dish, merging with an existing line for the same dish
pub fn add_item(items: &mut Vec<MenuSelection>, item: MenuSelection) -> Result<(), FormError> {
    validate_item(&item)?;
    match items.iter_mut().find(|i| i.dish_id == item.dish_id) {
        Some(existing) => {
            let quantity = existing.quantity.saturating_add(item.quantity);
            if quantity > MAX_QUANTITY {
                return Err(FormError::InvalidQuantity(item.dish_id));
            }
            existing.quantity = quantity;
        }
        None => items.push(item),
    }
    Ok(())
}

/// Set the quantity of a dish; zero removes the line. Returns false if absent.
pub fn set_quantity(
    items: &mut Vec<MenuSelection>,
    dish_id: &str,
    quantity: u32,
) -> Result<bool, FormError> {
    if quantity == 0 {
        return Ok(remove_item(items, dish_id));
    }
    if quantity > MAX_QUANTITY {
        return Err(FormError::InvalidQuantity(dish_id.to_string()));
    }
    Ok(match items.iter_mut().find(|i| i.dish_id == dish_id) {
        Some(item) => {
            item.quantity = quantity;
            true
        }
        None => false,
    })
}

pub fn remove_item(items: &mut Vec<MenuSelection>, dish_id: &str) -> bool {
    let before = items.len();
    items.retain(|i| i.dish_id != dish_id);
    items.len() != before
}
