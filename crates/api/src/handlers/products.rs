use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use praxis_core::{
    errors::PraxisError,
    models::product::{
        CreateProductRequest, NumericUpdate, Product, ProductResponse, UpdateProductRequest,
    },
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub(crate) fn product_response(product: Product) -> ProductResponse {
    ProductResponse {
        id: product.id,
        event_id: product.event_id,
        name: product.name,
        description: product.description,
        price: product.price,
        price_max: product.price_max,
        image: product.image,
        tags: product.tags,
        is_deleted: product.is_deleted,
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

#[axum::debug_handler]
pub async fn create_product(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if payload.price < 0.0 {
        return Err(AppError(PraxisError::Validation(
            "price must not be negative".to_string(),
        )));
    }

    praxis_db::repositories::event::get_event_by_id(&state.db_pool, event_id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", event_id)))?;

    let db_product =
        praxis_db::repositories::product::create_product(&state.db_pool, event_id, &payload)
            .await
            .map_err(PraxisError::Database)?;

    Ok(Json(product_response(db_product.into())))
}

/// Query parameters for product listings
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Soft-deleted lines are excluded unless explicitly requested
    pub include_deleted: Option<bool>,
}

#[axum::debug_handler]
pub async fn list_products(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    praxis_db::repositories::event::get_event_by_id(&state.db_pool, event_id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", event_id)))?;

    let db_products = praxis_db::repositories::product::list_products_by_event_id(
        &state.db_pool,
        event_id,
        query.include_deleted.unwrap_or(false),
    )
    .await
    .map_err(PraxisError::Database)?;

    let products = db_products
        .into_iter()
        .map(|row| product_response(row.into()))
        .collect();

    Ok(Json(products))
}

// Soft-deleted products remain readable by id.
#[axum::debug_handler]
pub async fn get_product(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let db_product = praxis_db::repositories::product::get_product_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Product with ID {} not found", id)))?;

    Ok(Json(product_response(db_product.into())))
}

fn validate_numeric_update(field: &str, update: &Option<NumericUpdate>) -> Result<(), AppError> {
    if let Some(NumericUpdate::Divide(divisor)) = update {
        if *divisor == 0.0 {
            return Err(AppError(PraxisError::Validation(format!(
                "cannot divide {field} by zero"
            ))));
        }
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn update_product(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    validate_numeric_update("price", &payload.price)?;
    validate_numeric_update("price_max", &payload.price_max)?;

    let db_product =
        praxis_db::repositories::product::update_product(&state.db_pool, id, &payload)
            .await
            .map_err(PraxisError::Database)?
            .ok_or_else(|| PraxisError::NotFound(format!("Product with ID {} not found", id)))?;

    Ok(Json(product_response(db_product.into())))
}

#[axum::debug_handler]
pub async fn delete_product(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let db_product = praxis_db::repositories::product::soft_delete_product(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Product with ID {} not found", id)))?;

    Ok(Json(product_response(db_product.into())))
}
