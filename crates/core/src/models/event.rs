use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PraxisError;
use crate::models::product::ProductResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Appointment,
    DayOff,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Appointment => "APPOINTMENT",
            EventKind::DayOff => "DAY_OFF",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = PraxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPOINTMENT" => Ok(EventKind::Appointment),
            "DAY_OFF" => Ok(EventKind::DayOff),
            other => Err(PraxisError::Validation(format!("unknown event kind: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Created,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Created,
        EventStatus::Confirmed,
        EventStatus::Completed,
        EventStatus::Cancelled,
        EventStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Created => "CREATED",
            EventStatus::Confirmed => "CONFIRMED",
            EventStatus::Completed => "COMPLETED",
            EventStatus::Cancelled => "CANCELLED",
            EventStatus::Rescheduled => "RESCHEDULED",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = PraxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(EventStatus::Created),
            "CONFIRMED" => Ok(EventStatus::Confirmed),
            "COMPLETED" => Ok(EventStatus::Completed),
            "CANCELLED" => Ok(EventStatus::Cancelled),
            "RESCHEDULED" => Ok(EventStatus::Rescheduled),
            other => Err(PraxisError::Validation(format!(
                "unknown event status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub kind: EventKind,
    pub status: EventStatus,
    pub patient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate reschedule slot awaiting confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedTime {
    pub id: Uuid,
    pub event_id: Uuid,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub kind: Option<EventKind>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: Option<bool>,
    pub status: Option<EventStatus>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub kind: EventKind,
    pub status: EventStatus,
    pub patient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_times: Option<Vec<ProposedTimeResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductResponse>>,
}

/// Compact event shape embedded in patient reads and calendar listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub kind: EventKind,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeTimeRequest {
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProposedTimeRequest {
    pub notified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedTimeResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub date: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: EventStatus,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: EventStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCountResponse {
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_status: Option<Vec<StatusCount>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub user_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub events: Vec<EventSummary>,
}
