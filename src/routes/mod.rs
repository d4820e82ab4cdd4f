use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{create_ticket, get_ticket, health_check, list_tickets, update_ticket};
use crate::tickets::TicketService;

pub fn create_routes(service: TicketService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route("/tickets/:id", get(get_ticket).patch(update_ticket))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(service)
}
