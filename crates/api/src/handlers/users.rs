use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;

use praxis_core::{
    errors::PraxisError,
    models::token::{
        ConsumeTokenRequest, ConsumeTokenResponse, IssueTokenRequest, IssueTokenResponse,
        TokenType,
    },
    models::user::{
        AccountSummary, CreateUserRequest, LinkAccountRequest, Profile, Role, UpdateUserRequest,
        UpsertProfileRequest, User, UserCountResponse, UserResponse,
    },
};
use praxis_db::filter::{Condition, ListOptions, SortDirection};
use uuid::Uuid;

use crate::{
    middleware::{
        auth,
        error_handling::{conflict_or_db, AppError},
    },
    ApiState,
};

fn user_response(
    user: User,
    profile: Option<Profile>,
    accounts: Option<Vec<AccountSummary>>,
) -> UserResponse {
    UserResponse {
        id: user.id,
        index: user.index,
        name: user.name,
        email: user.email,
        email_verified: user.email_verified,
        phone: user.phone,
        role: user.role,
        banned: user.banned,
        created_at: user.created_at,
        updated_at: user.updated_at,
        profile,
        accounts,
    }
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(PraxisError::Validation(
            "name must not be empty".to_string(),
        )));
    }

    // Hash password if provided
    let password_hash = match &payload.password {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let db_user = praxis_db::repositories::user::create_user(
        &state.db_pool,
        &payload,
        password_hash.as_deref(),
    )
    .await
    .map_err(|e| conflict_or_db(e, "email already registered"))?;

    let user = User::try_from(db_user)?;
    Ok(Json(user_response(user, None, None)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let db_user = praxis_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("User with ID {} not found", id)))?;

    let profile = praxis_db::repositories::user::get_profile_by_user_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .map(Profile::from);

    let accounts = praxis_db::repositories::user::list_accounts_by_user_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .into_iter()
        .map(AccountSummary::from)
        .collect();

    let user = User::try_from(db_user)?;
    Ok(Json(user_response(user, profile, Some(accounts))))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let db_user = praxis_db::repositories::user::update_user(&state.db_pool, id, &payload)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("User with ID {} not found", id)))?;

    let user = User::try_from(db_user)?;
    Ok(Json(user_response(user, None, None)))
}

/// Query parameters for user listings; the active-staff view asks for
/// `banned=false`.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub banned: Option<bool>,
    /// Case-insensitive substring match over name and email
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn user_list_filter(query: &ListUsersQuery) -> Option<Condition> {
    let mut conditions = Vec::new();

    if let Some(role) = query.role {
        conditions.push(Condition::eq("role", role.as_str()));
    }
    if let Some(banned) = query.banned {
        conditions.push(Condition::eq("banned", banned));
    }
    if let Some(search) = &query.search {
        conditions.push(Condition::Or(vec![
            Condition::contains("name", search.clone()),
            Condition::contains("email", search.clone()),
        ]));
    }

    if conditions.is_empty() {
        None
    } else {
        Some(Condition::And(conditions))
    }
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let options = ListOptions {
        filter: user_list_filter(&query),
        order_by: Some(("name".to_string(), SortDirection::Asc)),
        limit: query.limit,
        offset: query.offset,
    };

    let db_users = praxis_db::repositories::user::list_users(&state.db_pool, &options)
        .await
        .map_err(PraxisError::Database)?;

    let mut users = Vec::with_capacity(db_users.len());
    for db_user in db_users {
        users.push(user_response(User::try_from(db_user)?, None, None));
    }

    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn count_users(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserCountResponse>, AppError> {
    let filter = user_list_filter(&query);

    let total = praxis_db::repositories::user::count_users(&state.db_pool, filter.as_ref())
        .await
        .map_err(PraxisError::Database)?;

    Ok(Json(UserCountResponse { total }))
}

#[axum::debug_handler]
pub async fn upsert_profile(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    // The profile row references the user; surface a missing user as 404
    // instead of a foreign-key violation.
    praxis_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("User with ID {} not found", id)))?;

    let db_profile = praxis_db::repositories::user::upsert_profile(&state.db_pool, id, &payload)
        .await
        .map_err(PraxisError::Database)?;

    Ok(Json(Profile::from(db_profile)))
}

#[axum::debug_handler]
pub async fn link_account(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkAccountRequest>,
) -> Result<Json<AccountSummary>, AppError> {
    praxis_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("User with ID {} not found", id)))?;

    let db_account = praxis_db::repositories::user::link_account(&state.db_pool, id, &payload)
        .await
        .map_err(|e| conflict_or_db(e, "provider account already linked"))?;

    Ok(Json(AccountSummary::from(db_account)))
}

#[axum::debug_handler]
pub async fn unlink_account(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = praxis_db::repositories::user::unlink_account(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError(PraxisError::NotFound(format!(
            "Account with ID {} not found",
            id
        ))))
    }
}

// Default validity windows per token kind.
fn default_ttl(kind: TokenType) -> Duration {
    match kind {
        TokenType::Activation => Duration::hours(24),
        TokenType::PasswordReset => Duration::hours(1),
        TokenType::MagicLink => Duration::minutes(15),
    }
}

#[axum::debug_handler]
pub async fn issue_token(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IssueTokenRequest>,
) -> Result<Json<IssueTokenResponse>, AppError> {
    praxis_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("User with ID {} not found", id)))?;

    let ttl = match payload.ttl_minutes {
        Some(minutes) if minutes <= 0 => {
            return Err(AppError(PraxisError::Validation(
                "ttl_minutes must be positive".to_string(),
            )));
        }
        Some(minutes) => Duration::minutes(minutes),
        None => default_ttl(payload.kind),
    };

    let token_value = auth::generate_token();
    let expires = Utc::now() + ttl;

    let db_token = praxis_db::repositories::token::create_token(
        &state.db_pool,
        id,
        payload.kind,
        &token_value,
        expires,
    )
    .await
    .map_err(|e| conflict_or_db(e, "token value collision, retry"))?;

    Ok(Json(IssueTokenResponse {
        id: db_token.id,
        token: db_token.token,
        kind: payload.kind,
        expires: db_token.expires,
    }))
}

#[axum::debug_handler]
pub async fn consume_token(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ConsumeTokenRequest>,
) -> Result<Json<ConsumeTokenResponse>, AppError> {
    let db_token = praxis_db::repositories::token::consume_token(
        &state.db_pool,
        &payload.token,
        payload.kind,
    )
    .await
    .map_err(PraxisError::Database)?
    .ok_or_else(|| PraxisError::Authentication("invalid token".to_string()))?;

    // The row is already gone either way; an expired token stays unusable.
    if db_token.expires < Utc::now() {
        return Err(AppError(PraxisError::Authentication(
            "token expired".to_string(),
        )));
    }

    Ok(Json(ConsumeTokenResponse {
        user_id: db_token.user_id,
        kind: payload.kind,
    }))
}
