use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/appointments", post(handlers::events::create_event))
        .route("/api/appointments", get(handlers::events::list_events))
        .route("/api/appointments/count", get(handlers::events::count_events))
        .route("/api/appointments/:id", get(handlers::events::get_event))
        .route("/api/appointments/:id", patch(handlers::events::update_event))
        .route("/api/appointments/:id", delete(handlers::events::cancel_event))
        .route("/api/calendar", get(handlers::events::calendar))
        .route(
            "/api/appointments/:id/proposed-times",
            post(handlers::events::propose_time),
        )
        .route(
            "/api/appointments/:id/proposed-times",
            get(handlers::events::list_proposed_times),
        )
        .route(
            "/api/proposed-times/:id/accept",
            post(handlers::events::accept_proposed_time),
        )
        .route(
            "/api/proposed-times/:id/decline",
            post(handlers::events::decline_proposed_time),
        )
        .route(
            "/api/proposed-times/:id",
            patch(handlers::events::update_proposed_time),
        )
}
