use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use praxis_core::models::event::{Event, EventKind, EventStatus, ProposedTime};
use praxis_core::models::geo::{City, County};
use praxis_core::models::patient::{Patient, PatientStatus};
use praxis_core::models::product::Product;
use praxis_core::models::token::{Token, TokenType};
use praxis_core::models::user::{AccountSummary, Profile, Role, User};

// Enum columns are stored as text and parsed at this boundary; the DDL
// CHECK constraints keep undeclared values out of the tables.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub index: i64,
    pub name: String,
    pub email: String,
    pub email_verified: Option<DateTime<Utc>>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: String,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = eyre::Report;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            index: row.index,
            name: row.name,
            email: row.email,
            email_verified: row.email_verified,
            phone: row.phone,
            role: row.role.parse::<Role>()?,
            banned: row.banned,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub expires_at: Option<i64>,
    pub refresh_token_expires_in: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub session_state: Option<String>,
}

impl From<DbAccount> for AccountSummary {
    fn from(row: DbAccount) -> Self {
        AccountSummary {
            id: row.id,
            account_type: row.account_type,
            provider: row.provider,
            provider_account_id: row.provider_account_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbProfile> for Profile {
    fn from(row: DbProfile) -> Self {
        Profile {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            avatar: row.avatar,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

impl TryFrom<DbToken> for Token {
    type Error = eyre::Report;

    fn try_from(row: DbToken) -> Result<Self, Self::Error> {
        Ok(Token {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind.parse::<TokenType>()?,
            token: row.token,
            expires: row.expires,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub status: String,
    pub sms_notifications: bool,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbPatient> for Patient {
    type Error = eyre::Report;

    fn try_from(row: DbPatient) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            gender: row.gender,
            dob: row.dob,
            email: row.email,
            phone: row.phone,
            city: row.city,
            county: row.county,
            status: row.status.parse::<PatientStatus>()?,
            sms_notifications: row.sms_notifications,
            email_notifications: row.email_notifications,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub kind: String,
    pub status: String,
    pub patient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbEvent> for Event {
    type Error = eyre::Report;

    fn try_from(row: DbEvent) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            all_day: row.all_day,
            kind: row.kind.parse::<EventKind>()?,
            status: row.status.parse::<EventStatus>()?,
            patient_id: row.patient_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProposedTime {
    pub id: Uuid,
    pub event_id: Uuid,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: String,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbProposedTime> for ProposedTime {
    type Error = eyre::Report;

    fn try_from(row: DbProposedTime) -> Result<Self, Self::Error> {
        Ok(ProposedTime {
            id: row.id,
            event_id: row.event_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse::<EventStatus>()?,
            notified: row.notified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProduct {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_max: Option<f64>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbProduct> for Product {
    fn from(row: DbProduct) -> Self {
        Product {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            description: row.description,
            price: row.price,
            price_max: row.price_max,
            image: row.image,
            tags: row.tags,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCounty {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbCounty> for County {
    fn from(row: DbCounty) -> Self {
        County {
            id: row.id,
            name: row.name,
            code: row.code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCity {
    pub id: Uuid,
    pub county_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbCity> for City {
    fn from(row: DbCity) -> Self {
        City {
            id: row.id,
            county_id: row.county_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
