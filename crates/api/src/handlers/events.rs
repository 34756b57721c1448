use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use praxis_core::{
    errors::PraxisError,
    models::event::{
        CalendarResponse, CreateEventRequest, Event, EventCountResponse, EventKind,
        EventResponse, EventStatus, EventSummary, ProposeTimeRequest, ProposedTime,
        ProposedTimeResponse, StatusCount, UpdateEventRequest, UpdateProposedTimeRequest,
    },
};
use praxis_db::filter::{Condition, ListOptions, SortDirection};
use uuid::Uuid;

use crate::{handlers::products::product_response, middleware::error_handling::AppError, ApiState};

pub(crate) fn event_summary(event: Event) -> EventSummary {
    EventSummary {
        id: event.id,
        title: event.title,
        date: event.date,
        start_time: event.start_time,
        end_time: event.end_time,
        all_day: event.all_day,
        kind: event.kind,
        status: event.status,
    }
}

fn event_response(event: Event) -> EventResponse {
    EventResponse {
        id: event.id,
        user_id: event.user_id,
        title: event.title,
        description: event.description,
        date: event.date,
        start_time: event.start_time,
        end_time: event.end_time,
        all_day: event.all_day,
        kind: event.kind,
        status: event.status,
        patient_id: event.patient_id,
        created_at: event.created_at,
        updated_at: event.updated_at,
        proposed_times: None,
        products: None,
    }
}

pub(crate) fn proposed_time_response(proposed: ProposedTime) -> ProposedTimeResponse {
    ProposedTimeResponse {
        id: proposed.id,
        event_id: proposed.event_id,
        date: proposed.date,
        start_time: proposed.start_time,
        end_time: proposed.end_time,
        status: proposed.status,
        notified: proposed.notified,
        created_at: proposed.created_at,
        updated_at: proposed.updated_at,
    }
}

fn validate_time_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            return Err(AppError(PraxisError::Validation(
                "end_time must be after start_time".to_string(),
            )));
        }
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    validate_time_range(payload.start_time, payload.end_time)?;

    praxis_db::repositories::user::get_user_by_id(&state.db_pool, payload.user_id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| {
            PraxisError::NotFound(format!("User with ID {} not found", payload.user_id))
        })?;

    // An event may be created before it is tied to a patient, but a given
    // patient id must resolve.
    if let Some(patient_id) = payload.patient_id {
        praxis_db::repositories::patient::get_patient_by_id(&state.db_pool, patient_id)
            .await
            .map_err(PraxisError::Database)?
            .ok_or_else(|| {
                PraxisError::NotFound(format!("Patient with ID {} not found", patient_id))
            })?;
    }

    let db_event = praxis_db::repositories::event::create_event(&state.db_pool, &payload)
        .await
        .map_err(PraxisError::Database)?;

    Ok(Json(event_response(db_event.try_into()?)))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let db_event = praxis_db::repositories::event::get_event_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", id)))?;

    let proposed = praxis_db::repositories::event::list_proposed_times_by_event_id(
        &state.db_pool,
        id,
    )
    .await
    .map_err(PraxisError::Database)?;

    let products =
        praxis_db::repositories::product::list_products_by_event_id(&state.db_pool, id, false)
            .await
            .map_err(PraxisError::Database)?;

    let mut response = event_response(db_event.try_into()?);

    let mut proposed_times = Vec::with_capacity(proposed.len());
    for row in proposed {
        proposed_times.push(proposed_time_response(row.try_into()?));
    }
    response.proposed_times = Some(proposed_times);
    response.products = Some(
        products
            .into_iter()
            .map(|row| product_response(row.into()))
            .collect(),
    );

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    validate_time_range(payload.start_time, payload.end_time)?;

    if let Some(patient_id) = payload.patient_id {
        praxis_db::repositories::patient::get_patient_by_id(&state.db_pool, patient_id)
            .await
            .map_err(PraxisError::Database)?
            .ok_or_else(|| {
                PraxisError::NotFound(format!("Patient with ID {} not found", patient_id))
            })?;
    }

    let db_event = praxis_db::repositories::event::update_event(&state.db_pool, id, &payload)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", id)))?;

    Ok(Json(event_response(db_event.try_into()?)))
}

#[axum::debug_handler]
pub async fn cancel_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let db_event = praxis_db::repositories::event::cancel_event(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", id)))?;

    Ok(Json(event_response(db_event.try_into()?)))
}

/// Query parameters for event listings
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub user_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub status: Option<EventStatus>,
    pub kind: Option<EventKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn event_list_filter(query: &ListEventsQuery) -> Option<Condition> {
    let mut conditions = Vec::new();

    if let Some(user_id) = query.user_id {
        conditions.push(Condition::eq("user_id", user_id));
    }
    if let Some(patient_id) = query.patient_id {
        conditions.push(Condition::eq("patient_id", patient_id));
    }
    if let Some(status) = query.status {
        conditions.push(Condition::eq("status", status.as_str()));
    }
    if let Some(kind) = query.kind {
        conditions.push(Condition::eq("kind", kind.as_str()));
    }
    if let Some(from) = query.from {
        conditions.push(Condition::Gte("date".to_string(), from.into()));
    }
    if let Some(to) = query.to {
        conditions.push(Condition::Lt("date".to_string(), to.into()));
    }

    if conditions.is_empty() {
        None
    } else {
        Some(Condition::And(conditions))
    }
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let options = ListOptions {
        filter: event_list_filter(&query),
        order_by: Some(("date".to_string(), SortDirection::Asc)),
        limit: query.limit,
        offset: query.offset,
    };

    let db_events = praxis_db::repositories::event::list_events(&state.db_pool, &options)
        .await
        .map_err(PraxisError::Database)?;

    let mut events = Vec::with_capacity(db_events.len());
    for db_event in db_events {
        events.push(event_response(db_event.try_into()?));
    }

    Ok(Json(events))
}

/// Query parameters for the event count endpoint
#[derive(Debug, Deserialize)]
pub struct CountEventsQuery {
    pub user_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub status: Option<EventStatus>,
    /// When true, the response carries a per-status breakdown
    pub by_status: Option<bool>,
}

#[axum::debug_handler]
pub async fn count_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CountEventsQuery>,
) -> Result<Json<EventCountResponse>, AppError> {
    let mut conditions = Vec::new();
    if let Some(user_id) = query.user_id {
        conditions.push(Condition::eq("user_id", user_id));
    }
    if let Some(patient_id) = query.patient_id {
        conditions.push(Condition::eq("patient_id", patient_id));
    }
    if let Some(status) = query.status {
        conditions.push(Condition::eq("status", status.as_str()));
    }
    let filter = if conditions.is_empty() {
        None
    } else {
        Some(Condition::And(conditions))
    };

    let total = praxis_db::repositories::event::count_events(&state.db_pool, filter.as_ref())
        .await
        .map_err(PraxisError::Database)?;

    let by_status = if query.by_status.unwrap_or(false) {
        let rows = praxis_db::repositories::event::count_events_by_status(
            &state.db_pool,
            filter.as_ref(),
        )
        .await
        .map_err(PraxisError::Database)?;

        let mut counts = Vec::with_capacity(rows.len());
        for (status, count) in rows {
            counts.push(StatusCount {
                status: status.parse::<EventStatus>()?,
                count,
            });
        }
        Some(counts)
    } else {
        None
    };

    Ok(Json(EventCountResponse { total, by_status }))
}

/// Query parameters for the tenant calendar window
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub user_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[axum::debug_handler]
pub async fn calendar(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    if query.to <= query.from {
        return Err(AppError(PraxisError::Validation(
            "calendar window end must be after its start".to_string(),
        )));
    }

    let options = ListOptions {
        filter: Some(Condition::And(vec![
            Condition::eq("user_id", query.user_id),
            Condition::Gte("date".to_string(), query.from.into()),
            Condition::Lt("date".to_string(), query.to.into()),
        ])),
        order_by: Some(("date".to_string(), SortDirection::Asc)),
        limit: None,
        offset: None,
    };

    let db_events = praxis_db::repositories::event::list_events(&state.db_pool, &options)
        .await
        .map_err(PraxisError::Database)?;

    let mut events = Vec::with_capacity(db_events.len());
    for db_event in db_events {
        events.push(event_summary(db_event.try_into()?));
    }

    Ok(Json(CalendarResponse {
        user_id: query.user_id,
        from: query.from,
        to: query.to,
        events,
    }))
}

// Proposed times

#[axum::debug_handler]
pub async fn propose_time(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProposeTimeRequest>,
) -> Result<Json<ProposedTimeResponse>, AppError> {
    validate_time_range(payload.start_time, payload.end_time)?;

    praxis_db::repositories::event::get_event_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", id)))?;

    let db_proposed =
        praxis_db::repositories::event::create_proposed_time(&state.db_pool, id, &payload)
            .await
            .map_err(PraxisError::Database)?;

    Ok(Json(proposed_time_response(db_proposed.try_into()?)))
}

#[axum::debug_handler]
pub async fn list_proposed_times(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProposedTimeResponse>>, AppError> {
    praxis_db::repositories::event::get_event_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Event with ID {} not found", id)))?;

    let rows =
        praxis_db::repositories::event::list_proposed_times_by_event_id(&state.db_pool, id)
            .await
            .map_err(PraxisError::Database)?;

    let mut proposed = Vec::with_capacity(rows.len());
    for row in rows {
        proposed.push(proposed_time_response(row.try_into()?));
    }

    Ok(Json(proposed))
}

#[axum::debug_handler]
pub async fn accept_proposed_time(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let (db_event, db_proposed) =
        praxis_db::repositories::event::accept_proposed_time(&state.db_pool, id)
            .await
            .map_err(PraxisError::Database)?
            .ok_or_else(|| {
                PraxisError::NotFound(format!("Proposed time with ID {} not found", id))
            })?;

    let mut response = event_response(db_event.try_into()?);
    response.proposed_times = Some(vec![proposed_time_response(db_proposed.try_into()?)]);

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn decline_proposed_time(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposedTimeResponse>, AppError> {
    let db_proposed = praxis_db::repositories::event::decline_proposed_time(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| {
            PraxisError::NotFound(format!("Proposed time with ID {} not found", id))
        })?;

    Ok(Json(proposed_time_response(db_proposed.try_into()?)))
}

#[axum::debug_handler]
pub async fn update_proposed_time(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProposedTimeRequest>,
) -> Result<Json<ProposedTimeResponse>, AppError> {
    let db_proposed = praxis_db::repositories::event::set_proposed_time_notified(
        &state.db_pool,
        id,
        payload.notified,
    )
    .await
    .map_err(PraxisError::Database)?
    .ok_or_else(|| PraxisError::NotFound(format!("Proposed time with ID {} not found", id)))?;

    Ok(Json(proposed_time_response(db_proposed.try_into()?)))
}
