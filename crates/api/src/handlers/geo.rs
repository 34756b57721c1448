use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use praxis_core::{
    errors::PraxisError,
    models::geo::{City, County, CreateCityRequest, CreateCountyRequest, UpdateCountyRequest},
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_counties(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<County>>, AppError> {
    let counties = praxis_db::repositories::geo::list_counties(&state.db_pool)
        .await
        .map_err(PraxisError::Database)?
        .into_iter()
        .map(County::from)
        .collect();

    Ok(Json(counties))
}

#[axum::debug_handler]
pub async fn create_county(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateCountyRequest>,
) -> Result<Json<County>, AppError> {
    let county = praxis_db::repositories::geo::create_county(&state.db_pool, &payload)
        .await
        .map_err(PraxisError::Database)?;

    Ok(Json(County::from(county)))
}

#[axum::debug_handler]
pub async fn update_county(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCountyRequest>,
) -> Result<Json<County>, AppError> {
    let county = praxis_db::repositories::geo::update_county(&state.db_pool, id, &payload)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("County with ID {} not found", id)))?;

    Ok(Json(County::from(county)))
}

#[axum::debug_handler]
pub async fn list_cities(
    State(state): State<Arc<ApiState>>,
    Path(county_id): Path<Uuid>,
) -> Result<Json<Vec<City>>, AppError> {
    praxis_db::repositories::geo::get_county_by_id(&state.db_pool, county_id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| {
            PraxisError::NotFound(format!("County with ID {} not found", county_id))
        })?;

    let cities = praxis_db::repositories::geo::list_cities_by_county_id(&state.db_pool, county_id)
        .await
        .map_err(PraxisError::Database)?
        .into_iter()
        .map(City::from)
        .collect();

    Ok(Json(cities))
}

#[axum::debug_handler]
pub async fn create_city(
    State(state): State<Arc<ApiState>>,
    Path(county_id): Path<Uuid>,
    Json(payload): Json<CreateCityRequest>,
) -> Result<Json<City>, AppError> {
    praxis_db::repositories::geo::get_county_by_id(&state.db_pool, county_id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| {
            PraxisError::NotFound(format!("County with ID {} not found", county_id))
        })?;

    let city = praxis_db::repositories::geo::create_city(&state.db_pool, county_id, &payload)
        .await
        .map_err(PraxisError::Database)?;

    Ok(Json(City::from(city)))
}
