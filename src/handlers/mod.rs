use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::models::ticket::{CreateTicketInput, TicketPatch};
use crate::tickets::TicketService;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    timestamp: String,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "eticket-api",
        timestamp: Utc::now().to_rfc3339(),
    };

    success(payload, "Health check successful").into_response()
}

pub async fn create_ticket(
    State(service): State<TicketService>,
    payload: Result<Json<CreateTicketInput>, JsonRejection>,
) -> Result<Response, AppError> {
    // A body that fails to deserialize (missing field, unparseable date) is a
    // validation failure and gets the same envelope as field-rule failures.
    let Json(input) = payload.map_err(|e| AppError::MalformedBody(e.body_text()))?;
    let ticket = service.create(input).await?;
    Ok(success(ticket, "E-ticket created").into_response())
}

/// The consumer lookup flow: path parameter is the business key, and an
/// unknown ticket_id is a normal outcome (`data: null`), not a 404.
pub async fn get_ticket(
    State(service): State<TicketService>,
    Path(ticket_id): Path<String>,
) -> Result<Response, AppError> {
    let ticket = service.get_by_ticket_id(&ticket_id).await?;
    let message = match &ticket {
        Some(_) => "E-ticket found",
        None => "No e-ticket with that ticket_id",
    };
    Ok(success(ticket, message).into_response())
}

pub async fn list_tickets(State(service): State<TicketService>) -> Result<Response, AppError> {
    let tickets = service.list_all().await?;
    Ok(success(tickets, "E-tickets retrieved").into_response())
}

/// Partial update by surrogate id; an unknown id yields `data: null`.
pub async fn update_ticket(
    State(service): State<TicketService>,
    Path(id): Path<i64>,
    payload: Result<Json<TicketPatch>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(patch) = payload.map_err(|e| AppError::MalformedBody(e.body_text()))?;
    let ticket = service.update(id, patch).await?;
    let message = match &ticket {
        Some(_) => "E-ticket updated",
        None => "No e-ticket with that id",
    };
    Ok(success(ticket, message).into_response())
}
