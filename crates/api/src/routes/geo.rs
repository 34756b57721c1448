use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/counties", get(handlers::geo::list_counties))
        .route("/api/counties", post(handlers::geo::create_county))
        .route("/api/counties/:id", patch(handlers::geo::update_county))
        .route("/api/counties/:id/cities", get(handlers::geo::list_cities))
        .route("/api/counties/:id/cities", post(handlers::geo::create_city))
}
