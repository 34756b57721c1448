use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments/:id/products",
            post(handlers::products::create_product),
        )
        .route(
            "/api/appointments/:id/products",
            get(handlers::products::list_products),
        )
        .route("/api/products/:id", get(handlers::products::get_product))
        .route("/api/products/:id", patch(handlers::products::update_product))
        .route("/api/products/:id", delete(handlers::products::delete_product))
}
