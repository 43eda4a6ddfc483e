//! HTTP surface: JSON routes over the lookup and communication facades.

mod error;
mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorBody, ErrorKind};
pub use handlers::{BatchResponse, OutcomeBody};

use crate::service::{CommunicationService, LookupService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub lookup: LookupService,
    pub communication: CommunicationService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/lookup", post(handlers::lookup))
        .route("/lookups", post(handlers::lookups))
        .route("/sms", post(handlers::sms))
        .route("/broadcastSMS", post(handlers::broadcast_sms))
        .route("/call", post(handlers::call))
        .route("/calls", post(handlers::calls))
        .route("/conference", post(handlers::conference))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
