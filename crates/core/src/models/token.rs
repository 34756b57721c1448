use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PraxisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Activation,
    PasswordReset,
    MagicLink,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Activation => "ACTIVATION",
            TokenType::PasswordReset => "PASSWORD_RESET",
            TokenType::MagicLink => "MAGIC_LINK",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenType {
    type Err = PraxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVATION" => Ok(TokenType::Activation),
            "PASSWORD_RESET" => Ok(TokenType::PasswordReset),
            "MAGIC_LINK" => Ok(TokenType::MagicLink),
            other => Err(PraxisError::Validation(format!("unknown token type: {other}"))),
        }
    }
}

/// Single-use credential (activation, password reset, magic link).
/// Consuming a token deletes the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TokenType,
    pub token: String,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenRequest {
    pub kind: TokenType,
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenResponse {
    pub id: Uuid,
    pub token: String,
    pub kind: TokenType,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumeTokenRequest {
    pub token: String,
    pub kind: TokenType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumeTokenResponse {
    pub user_id: Uuid,
    pub kind: TokenType,
}
