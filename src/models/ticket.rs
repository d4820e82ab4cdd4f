use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted e-ticket row. `id` is the store-assigned surrogate key;
/// `ticket_id` is the business key printed on the ticket and used for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: i64,
    pub ticket_id: String,
    pub passenger_name: String,
    pub travel_date: NaiveDate,
    /// Time of travel in `HH:MM` form. Stored and compared as text.
    pub travel_time: String,
    pub origin: String,
    pub destination: String,
    pub seat_number: String,
    pub booking_reference: String,
    pub qr_code_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for creating an e-ticket. `qr_code_data` may be
/// omitted, in which case a default is derived from the ticket and booking ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketInput {
    pub ticket_id: String,
    pub passenger_name: String,
    pub travel_date: NaiveDate,
    pub travel_time: String,
    pub origin: String,
    pub destination: String,
    pub seat_number: String,
    pub booking_reference: String,
    pub qr_code_data: Option<String>,
}

/// A validated ticket ready for insertion; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub ticket_id: String,
    pub passenger_name: String,
    pub travel_date: NaiveDate,
    pub travel_time: String,
    pub origin: String,
    pub destination: String,
    pub seat_number: String,
    pub booking_reference: String,
    pub qr_code_data: String,
}

impl NewTicket {
    pub fn from_input(input: CreateTicketInput) -> Self {
        let qr_code_data = input.qr_code_data.unwrap_or_else(|| {
            format!("TICKET:{}:{}", input.ticket_id, input.booking_reference)
        });

        Self {
            ticket_id: input.ticket_id,
            passenger_name: input.passenger_name,
            travel_date: input.travel_date,
            travel_time: input.travel_time,
            origin: input.origin,
            destination: input.destination,
            seat_number: input.seat_number,
            booking_reference: input.booking_reference,
            qr_code_data,
        }
    }
}

/// A partial update. `None` means "leave the field unchanged"; there is no
/// clear-to-empty state. `ticket_id` is deliberately absent: the business key
/// is immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketPatch {
    pub passenger_name: Option<String>,
    pub travel_date: Option<NaiveDate>,
    pub travel_time: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub seat_number: Option<String>,
    pub booking_reference: Option<String>,
    pub qr_code_data: Option<String>,
}
