use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/users", post(handlers::users::create_user))
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/count", get(handlers::users::count_users))
        .route("/api/users/:id", get(handlers::users::get_user))
        .route("/api/users/:id", patch(handlers::users::update_user))
        .route("/api/users/:id/profile", put(handlers::users::upsert_profile))
        .route("/api/users/:id/accounts", post(handlers::users::link_account))
        .route("/api/accounts/:id", delete(handlers::users::unlink_account))
        .route("/api/users/:id/tokens", post(handlers::users::issue_token))
        .route("/api/tokens/consume", post(handlers::users::consume_token))
}
