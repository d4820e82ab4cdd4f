use thiserror::Error;

use crate::models::ticket::{CreateTicketInput, NewTicket, TicketPatch, TicketRecord};
use crate::store::{StoreError, TicketStore};
use crate::validation::{self, FieldError};

#[derive(Debug, Error)]
pub enum TicketError {
    #[error(transparent)]
    Validation(#[from] FieldError),

    #[error("an e-ticket with ticket_id '{0}' already exists")]
    Conflict(String),

    #[error("ticket store unavailable")]
    Store(#[source] sqlx::Error),
}

impl From<StoreError> for TicketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(ticket_id) => TicketError::Conflict(ticket_id),
            StoreError::Database(e) => TicketError::Store(e),
        }
    }
}

/// The e-ticket operations: validation, the QR-data default, and the store
/// calls. The store is passed in at construction; there is no ambient
/// connection state.
#[derive(Debug, Clone)]
pub struct TicketService {
    store: TicketStore,
}

impl TicketService {
    pub fn new(store: TicketStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateTicketInput) -> Result<TicketRecord, TicketError> {
        validation::validate_create(&input)?;
        let ticket = NewTicket::from_input(input);
        Ok(self.store.insert(&ticket).await?)
    }

    /// A missing ticket is an expected outcome of the lookup flow, so absence
    /// is `Ok(None)`, not an error.
    pub async fn get_by_ticket_id(
        &self,
        ticket_id: &str,
    ) -> Result<Option<TicketRecord>, TicketError> {
        Ok(self.store.find_by_ticket_id(ticket_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<TicketRecord>, TicketError> {
        Ok(self.store.list_all().await?)
    }

    /// Partial update by surrogate id. Fields absent from the patch are left
    /// untouched; `ticket_id` and `created_at` are never mutable. Returns
    /// `Ok(None)` when the id is unknown.
    pub async fn update(
        &self,
        id: i64,
        patch: TicketPatch,
    ) -> Result<Option<TicketRecord>, TicketError> {
        validation::validate_patch(&patch)?;
        Ok(self.store.update_by_id(id, &patch).await?)
    }
}
