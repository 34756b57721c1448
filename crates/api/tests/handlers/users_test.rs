use chrono::{Duration, Utc};
use mockall::predicate;
use praxis_api::middleware::error_handling::AppError;
use praxis_core::{
    errors::PraxisError,
    models::token::TokenType,
    models::user::Role,
};
use praxis_db::models::{DbToken, DbUser};
use uuid::Uuid;

use crate::test_utils::TestContext;

fn db_user(id: Uuid, role: &str) -> DbUser {
    let now = Utc::now();
    DbUser {
        id,
        index: 1,
        name: "Dr. Radu".to_string(),
        email: "radu@praxis.example".to_string(),
        email_verified: None,
        phone: None,
        password_hash: Some("$argon2id$stub".to_string()),
        role: role.to_string(),
        banned: false,
        created_at: now,
        updated_at: now,
    }
}

fn db_token(user_id: Uuid, kind: TokenType, expires_in: Duration) -> DbToken {
    DbToken {
        id: Uuid::new_v4(),
        user_id,
        kind: kind.as_str().to_string(),
        token: "tok-value".to_string(),
        expires: Utc::now() + expires_in,
    }
}

// Mirrors the consume handler: the row is deleted on lookup, then the
// expiry gate runs.
async fn test_consume_token_wrapper(
    ctx: &mut TestContext,
    token: String,
    kind: TokenType,
) -> Result<Uuid, AppError> {
    let row = ctx
        .token_repo
        .consume_token(token, kind)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::Authentication("invalid token".to_string()))?;

    if row.expires < Utc::now() {
        return Err(AppError(PraxisError::Authentication(
            "token expired".to_string(),
        )));
    }

    Ok(row.user_id)
}

#[tokio::test]
async fn test_consume_valid_token() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    ctx.token_repo
        .expect_consume_token()
        .with(
            predicate::eq("tok-value".to_string()),
            predicate::eq(TokenType::MagicLink),
        )
        .times(1)
        .returning(move |_, kind| Ok(Some(db_token(user_id, kind, Duration::minutes(10)))));

    let resolved = test_consume_token_wrapper(&mut ctx, "tok-value".to_string(), TokenType::MagicLink)
        .await
        .expect("token should be valid");

    assert_eq!(resolved, user_id);
}

#[tokio::test]
async fn test_consume_expired_token_is_rejected() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    ctx.token_repo
        .expect_consume_token()
        .returning(move |_, kind| Ok(Some(db_token(user_id, kind, Duration::minutes(-5)))));

    let result =
        test_consume_token_wrapper(&mut ctx, "tok-value".to_string(), TokenType::PasswordReset)
            .await;

    match result.unwrap_err().0 {
        PraxisError::Authentication(message) => assert_eq!(message, "token expired"),
        e => panic!("Expected Authentication error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_consume_unknown_token_is_rejected() {
    let mut ctx = TestContext::new();

    ctx.token_repo
        .expect_consume_token()
        .returning(|_, _| Ok(None));

    let result =
        test_consume_token_wrapper(&mut ctx, "missing".to_string(), TokenType::Activation).await;

    assert!(matches!(
        result.unwrap_err().0,
        PraxisError::Authentication(_)
    ));
}

#[tokio::test]
async fn test_wrong_kind_does_not_consume() {
    let mut ctx = TestContext::new();

    // A password-reset value presented as an activation token matches no
    // row, so nothing is consumed.
    ctx.token_repo
        .expect_consume_token()
        .with(
            predicate::always(),
            predicate::eq(TokenType::Activation),
        )
        .returning(|_, _| Ok(None));

    let result =
        test_consume_token_wrapper(&mut ctx, "reset-value".to_string(), TokenType::Activation)
            .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_new_user_defaults_to_user_role() {
    let mut ctx = TestContext::new();

    ctx.user_repo
        .expect_create_user()
        .times(1)
        .returning(|request, password_hash| {
            let mut user = db_user(Uuid::new_v4(), request.role.unwrap_or(Role::User).as_str());
            user.name = request.name;
            user.email = request.email;
            user.password_hash = password_hash;
            Ok(user)
        });

    let created = ctx
        .user_repo
        .create_user(
            praxis_core::models::user::CreateUserRequest {
                name: "Ana".to_string(),
                email: "ana@praxis.example".to_string(),
                password: None,
                phone: None,
                role: None,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(created.role, "USER");
    assert!(!created.banned);
    assert!(created.password_hash.is_none());
}
