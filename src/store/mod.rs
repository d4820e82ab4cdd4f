use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use thiserror::Error;

use crate::models::ticket::{NewTicket, TicketPatch, TicketRecord};
use crate::validation::{travel_date_from_storage, travel_date_to_storage};

pub static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket_id '{0}' already exists")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

const TICKET_COLUMNS: &str = "id, ticket_id, passenger_name, travel_date, travel_time, \
     origin, destination, seat_number, booking_reference, qr_code_data, created_at, updated_at";

/// Row as it lives in SQLite: `travel_date` is `YYYY-MM-DD` text at rest.
#[derive(Debug, FromRow)]
struct TicketRow {
    id: i64,
    ticket_id: String,
    passenger_name: String,
    travel_date: String,
    travel_time: String,
    origin: String,
    destination: String,
    seat_number: String,
    booking_reference: String,
    qr_code_data: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TicketRow {
    fn into_record(self) -> Result<TicketRecord, StoreError> {
        let travel_date = travel_date_from_storage(&self.travel_date).map_err(|e| {
            StoreError::Database(sqlx::Error::ColumnDecode {
                index: "travel_date".to_string(),
                source: Box::new(e),
            })
        })?;

        Ok(TicketRecord {
            id: self.id,
            ticket_id: self.ticket_id,
            passenger_name: self.passenger_name,
            travel_date,
            travel_time: self.travel_time,
            origin: self.origin,
            destination: self.destination,
            seat_number: self.seat_number,
            booking_reference: self.booking_reference,
            qr_code_data: self.qr_code_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Durable keyed storage for e-tickets over a SQLite pool. The uniqueness of
/// `ticket_id` and the atomicity of updates are enforced here, by the
/// database, not by callers.
#[derive(Debug, Clone)]
pub struct TicketStore {
    pool: SqlitePool,
}

impl TicketStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new ticket, assigning the surrogate id and both timestamps.
    /// The uniqueness check and the row creation are one statement, so two
    /// concurrent inserts of the same `ticket_id` yield exactly one conflict.
    pub async fn insert(&self, ticket: &NewTicket) -> Result<TicketRecord, StoreError> {
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO e_tickets (ticket_id, passenger_name, travel_date, travel_time, \
             origin, destination, seat_number, booking_reference, qr_code_data, \
             created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
             RETURNING {TICKET_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(&ticket.ticket_id)
            .bind(&ticket.passenger_name)
            .bind(travel_date_to_storage(ticket.travel_date))
            .bind(&ticket.travel_time)
            .bind(&ticket.origin)
            .bind(&ticket.destination)
            .bind(&ticket.seat_number)
            .bind(&ticket.booking_reference)
            .bind(&ticket.qr_code_data)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return StoreError::Conflict(ticket.ticket_id.clone());
                    }
                }
                StoreError::Database(e)
            })?;

        row.into_record()
    }

    /// Exact, case-sensitive lookup by business key.
    pub async fn find_by_ticket_id(
        &self,
        ticket_id: &str,
    ) -> Result<Option<TicketRecord>, StoreError> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM e_tickets WHERE ticket_id = ?1");

        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TicketRow::into_record).transpose()
    }

    /// All tickets, newest-created first. Equal timestamps keep insertion
    /// order (ids are assigned in insertion order).
    pub async fn list_all(&self) -> Result<Vec<TicketRecord>, StoreError> {
        let sql =
            format!("SELECT {TICKET_COLUMNS} FROM e_tickets ORDER BY created_at DESC, id ASC");

        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TicketRow::into_record).collect()
    }

    /// Applies only the fields present in `patch`, always advancing
    /// `updated_at`, and returns the full updated row. A single UPDATE
    /// statement, so readers never observe a partially applied patch.
    /// Returns `None` if no row has this id.
    pub async fn update_by_id(
        &self,
        id: i64,
        patch: &TicketPatch,
    ) -> Result<Option<TicketRecord>, StoreError> {
        let sql = format!(
            "UPDATE e_tickets SET \
             passenger_name = COALESCE(?1, passenger_name), \
             travel_date = COALESCE(?2, travel_date), \
             travel_time = COALESCE(?3, travel_time), \
             origin = COALESCE(?4, origin), \
             destination = COALESCE(?5, destination), \
             seat_number = COALESCE(?6, seat_number), \
             booking_reference = COALESCE(?7, booking_reference), \
             qr_code_data = COALESCE(?8, qr_code_data), \
             updated_at = ?9 \
             WHERE id = ?10 \
             RETURNING {TICKET_COLUMNS}"
        );

        let row = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(patch.passenger_name.as_deref())
            .bind(patch.travel_date.map(travel_date_to_storage))
            .bind(patch.travel_time.as_deref())
            .bind(patch.origin.as_deref())
            .bind(patch.destination.as_deref())
            .bind(patch.seat_number.as_deref())
            .bind(patch.booking_reference.as_deref())
            .bind(patch.qr_code_data.as_deref())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TicketRow::into_record).transpose()
    }
}
