use crate::filter::{push_count_clause, push_list_clauses, Condition, ListOptions};
use crate::models::{DbAccount, DbProfile, DbUser};
use chrono::Utc;
use eyre::Result;
use praxis_core::models::user::{
    CreateUserRequest, LinkAccountRequest, Role, UpdateUserRequest, UpsertProfileRequest,
};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

pub const USER_COLUMNS: &[&str] = &[
    "id",
    "index",
    "name",
    "email",
    "email_verified",
    "phone",
    "role",
    "banned",
    "created_at",
    "updated_at",
];

const USER_RETURNING: &str = r#"id, "index", name, email, email_verified, phone, password_hash, role, banned, created_at, updated_at"#;

pub async fn create_user(
    pool: &Pool<Postgres>,
    request: &CreateUserRequest,
    password_hash: Option<&str>,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let role = request.role.unwrap_or(Role::User);

    tracing::debug!("Creating user: id={}, email={}, role={}", id, request.email, role);

    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (id, name, email, phone, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {USER_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.phone)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_RETURNING}
        FROM users
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {USER_RETURNING}
        FROM users
        WHERE email = $1
        "#,
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_user(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateUserRequest,
) -> Result<Option<DbUser>> {
    let Some(user) = get_user_by_id(pool, id).await? else {
        return Ok(None);
    };

    let name = request.name.as_deref().unwrap_or(&user.name);
    let phone = request.phone.as_deref().or(user.phone.as_deref());
    let role = request
        .role
        .map(|r| r.as_str().to_string())
        .unwrap_or(user.role);
    let banned = request.banned.unwrap_or(user.banned);
    let email_verified = request.email_verified.or(user.email_verified);
    let now = Utc::now();

    let updated = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET name = $2, phone = $3, role = $4, banned = $5, email_verified = $6, updated_at = $7
        WHERE id = $1
        RETURNING {USER_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(role)
    .bind(banned)
    .bind(email_verified)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

pub async fn list_users(pool: &Pool<Postgres>, options: &ListOptions) -> Result<Vec<DbUser>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {USER_RETURNING} FROM users"
    ));
    push_list_clauses(&mut qb, options, USER_COLUMNS)?;

    let users = qb.build_query_as::<DbUser>().fetch_all(pool).await?;
    Ok(users)
}

pub async fn count_users(pool: &Pool<Postgres>, filter: Option<&Condition>) -> Result<i64> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users");
    push_count_clause(&mut qb, filter, USER_COLUMNS)?;

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

// Profile (1:1 with users; the unique user_id constraint makes this an upsert)

const PROFILE_RETURNING: &str =
    "id, user_id, first_name, last_name, avatar, created_at, updated_at";

pub async fn upsert_profile(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    request: &UpsertProfileRequest,
) -> Result<DbProfile> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let profile = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        INSERT INTO profiles (id, user_id, first_name, last_name, avatar, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        ON CONFLICT (user_id)
        DO UPDATE SET first_name = $3, last_name = $4, avatar = $5, updated_at = $6
        RETURNING {PROFILE_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(user_id)
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(&request.avatar)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(profile)
}

pub async fn get_profile_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<DbProfile>> {
    let profile = sqlx::query_as::<_, DbProfile>(&format!(
        r#"
        SELECT {PROFILE_RETURNING}
        FROM profiles
        WHERE user_id = $1
        "#,
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

// Accounts (external auth provider linkage)

const ACCOUNT_RETURNING: &str = "id, user_id, account_type, provider, provider_account_id, \
     refresh_token, access_token, expires_at, refresh_token_expires_in, token_type, scope, \
     id_token, session_state";

pub async fn link_account(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    request: &LinkAccountRequest,
) -> Result<DbAccount> {
    let id = Uuid::new_v4();

    let account = sqlx::query_as::<_, DbAccount>(&format!(
        r#"
        INSERT INTO accounts (id, user_id, account_type, provider, provider_account_id,
                              refresh_token, access_token, expires_at, refresh_token_expires_in,
                              token_type, scope, id_token, session_state)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {ACCOUNT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(user_id)
    .bind(&request.account_type)
    .bind(&request.provider)
    .bind(&request.provider_account_id)
    .bind(&request.refresh_token)
    .bind(&request.access_token)
    .bind(request.expires_at)
    .bind(request.refresh_token_expires_in)
    .bind(&request.token_type)
    .bind(&request.scope)
    .bind(&request.id_token)
    .bind(&request.session_state)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

pub async fn list_accounts_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbAccount>> {
    let accounts = sqlx::query_as::<_, DbAccount>(&format!(
        r#"
        SELECT {ACCOUNT_RETURNING}
        FROM accounts
        WHERE user_id = $1
        ORDER BY provider ASC
        "#,
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

pub async fn unlink_account(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM accounts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
