use crate::models::DbToken;
use chrono::{DateTime, Utc};
use eyre::Result;
use praxis_core::models::token::TokenType;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const TOKEN_RETURNING: &str = "id, user_id, kind, token, expires";

pub async fn create_token(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    kind: TokenType,
    token: &str,
    expires: DateTime<Utc>,
) -> Result<DbToken> {
    let id = Uuid::new_v4();

    tracing::debug!("Issuing {} token for user {}", kind, user_id);

    let row = sqlx::query_as::<_, DbToken>(&format!(
        r#"
        INSERT INTO tokens (id, user_id, kind, token, expires)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {TOKEN_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(user_id)
    .bind(kind.as_str())
    .bind(token)
    .bind(expires)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_token_by_value(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbToken>> {
    let row = sqlx::query_as::<_, DbToken>(&format!(
        r#"
        SELECT {TOKEN_RETURNING}
        FROM tokens
        WHERE token = $1
        "#,
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

// Tokens are single-use: consuming removes the row so a second attempt
// with the same value fails regardless of expiry.
pub async fn consume_token(
    pool: &Pool<Postgres>,
    token: &str,
    kind: TokenType,
) -> Result<Option<DbToken>> {
    let row = sqlx::query_as::<_, DbToken>(&format!(
        r#"
        DELETE FROM tokens
        WHERE token = $1 AND kind = $2
        RETURNING {TOKEN_RETURNING}
        "#,
    ))
    .bind(token)
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_tokens_by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    kind: TokenType,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM tokens
        WHERE user_id = $1 AND kind = $2
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
