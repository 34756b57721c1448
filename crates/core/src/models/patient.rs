use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PraxisError;
use crate::models::event::EventSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    Active,
    Inactive,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "ACTIVE",
            PatientStatus::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PatientStatus {
    type Err = PraxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(PatientStatus::Active),
            "INACTIVE" => Ok(PatientStatus::Inactive),
            other => Err(PraxisError::Validation(format!(
                "unknown patient status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
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
    pub status: PatientStatus,
    pub sms_notifications: bool,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub status: Option<PatientStatus>,
    pub sms_notifications: Option<bool>,
    pub email_notifications: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub status: Option<PatientStatus>,
    pub sms_notifications: Option<bool>,
    pub email_notifications: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientResponse {
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
    pub status: PatientStatus,
    pub sms_notifications: bool,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointments: Option<Vec<EventSummary>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCountResponse {
    pub total: i64,
}
