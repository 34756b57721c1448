use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/patients", post(handlers::patients::create_patient))
        .route("/api/patients", get(handlers::patients::list_patients))
        .route("/api/patients/count", get(handlers::patients::count_patients))
        .route("/api/patients/:id", get(handlers::patients::get_patient))
        .route("/api/patients/:id", patch(handlers::patients::update_patient))
}
