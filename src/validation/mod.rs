use chrono::NaiveDate;
use thiserror::Error;

use crate::models::ticket::{CreateTicketInput, TicketPatch};

/// A validation failure naming the offending field and the rule it violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {rule}")]
pub struct FieldError {
    pub field: &'static str,
    pub rule: &'static str,
}

impl FieldError {
    fn new(field: &'static str, rule: &'static str) -> Self {
        Self { field, rule }
    }
}

/// Validates creation input: every string field must be non-empty and
/// `travel_time` must be a well-formed time. `travel_date` is already a typed
/// calendar date by the time it reaches here.
pub fn validate_create(input: &CreateTicketInput) -> Result<(), FieldError> {
    require_non_empty("ticket_id", &input.ticket_id)?;
    require_non_empty("passenger_name", &input.passenger_name)?;
    validate_travel_time(&input.travel_time)?;
    require_non_empty("origin", &input.origin)?;
    require_non_empty("destination", &input.destination)?;
    require_non_empty("seat_number", &input.seat_number)?;
    require_non_empty("booking_reference", &input.booking_reference)?;
    Ok(())
}

/// Validates a partial update. No field is required; format rules still apply
/// to whichever fields are present.
pub fn validate_patch(patch: &TicketPatch) -> Result<(), FieldError> {
    if let Some(travel_time) = &patch.travel_time {
        validate_travel_time(travel_time)?;
    }
    Ok(())
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    Ok(())
}

/// `HH:MM`, exactly two digits each, hour 00-23, minute 00-59. One-digit
/// hours such as `9:30` are rejected by choice: every stored time has one
/// canonical text form, so times compare consistently as text.
pub fn validate_travel_time(value: &str) -> Result<(), FieldError> {
    let invalid = FieldError::new("travel_time", "must be a time in HH:MM format");

    let Some((hour, minute)) = value.split_once(':') else {
        return Err(invalid);
    };
    if hour.len() != 2 || minute.len() != 2 {
        return Err(invalid);
    }
    if !hour.bytes().all(|b| b.is_ascii_digit()) || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid);
    }
    // Two ASCII digits always parse.
    let hour: u8 = hour.parse().map_err(|_| invalid.clone())?;
    let minute: u8 = minute.parse().map_err(|_| invalid.clone())?;
    if hour > 23 || minute > 59 {
        return Err(invalid);
    }
    Ok(())
}

/// Wire -> storage: the calendar date as `YYYY-MM-DD` text. No time-of-day and
/// no timezone is involved, so the day can never shift.
pub fn travel_date_to_storage(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Storage -> wire: parse `YYYY-MM-DD` text back into a calendar date.
pub fn travel_date_from_storage(raw: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| FieldError::new("travel_date", "must be a calendar date in YYYY-MM-DD form"))
}
