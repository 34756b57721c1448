use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Treatment or service line attached to an appointment.
/// Rows are soft-deleted; `is_deleted` rows stay retrievable by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
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

/// Field delta for numeric columns: either replace the value or apply
/// an arithmetic adjustment to the stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericUpdate {
    Set(f64),
    Increment(f64),
    Decrement(f64),
    Multiply(f64),
    Divide(f64),
}

/// Whole-list replacement or single-item append for tag lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagsUpdate {
    Set(Vec<String>),
    Push(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_max: Option<f64>,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<NumericUpdate>,
    pub price_max: Option<NumericUpdate>,
    pub tags: Option<TagsUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
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
