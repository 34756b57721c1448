use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use praxis_core::{
    errors::PraxisError,
    models::patient::{
        CreatePatientRequest, Patient, PatientCountResponse, PatientResponse, PatientStatus,
        UpdatePatientRequest,
    },
};
use praxis_db::filter::{Condition, ListOptions, SortDirection};
use uuid::Uuid;

use crate::{handlers::events::event_summary, middleware::error_handling::AppError, ApiState};

fn patient_response(patient: Patient) -> PatientResponse {
    PatientResponse {
        id: patient.id,
        user_id: patient.user_id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        gender: patient.gender,
        dob: patient.dob,
        email: patient.email,
        phone: patient.phone,
        city: patient.city,
        county: patient.county,
        status: patient.status,
        sms_notifications: patient.sms_notifications,
        email_notifications: patient.email_notifications,
        created_at: patient.created_at,
        updated_at: patient.updated_at,
        appointments: None,
    }
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    // The owning clinician must exist; surface it as 404 rather than a
    // foreign-key violation.
    praxis_db::repositories::user::get_user_by_id(&state.db_pool, payload.user_id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| {
            PraxisError::NotFound(format!("User with ID {} not found", payload.user_id))
        })?;

    let db_patient = praxis_db::repositories::patient::create_patient(&state.db_pool, &payload)
        .await
        .map_err(PraxisError::Database)?;

    let patient = Patient::try_from(db_patient)?;
    Ok(Json(patient_response(patient)))
}

/// Query parameters for single-patient reads
#[derive(Debug, Deserialize)]
pub struct GetPatientQuery {
    /// Set to "appointments" to embed the patient's events
    pub include: Option<String>,
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<GetPatientQuery>,
) -> Result<Json<PatientResponse>, AppError> {
    let db_patient = praxis_db::repositories::patient::get_patient_by_id(&state.db_pool, id)
        .await
        .map_err(PraxisError::Database)?
        .ok_or_else(|| PraxisError::NotFound(format!("Patient with ID {} not found", id)))?;

    let patient = Patient::try_from(db_patient)?;
    let mut response = patient_response(patient);

    if query.include.as_deref() == Some("appointments") {
        let options = ListOptions {
            filter: Some(Condition::eq("patient_id", id)),
            order_by: Some(("date".to_string(), SortDirection::Asc)),
            limit: None,
            offset: None,
        };
        let events = praxis_db::repositories::event::list_events(&state.db_pool, &options)
            .await
            .map_err(PraxisError::Database)?;

        let mut appointments = Vec::with_capacity(events.len());
        for event in events {
            appointments.push(event_summary(event.try_into()?));
        }
        response.appointments = Some(appointments);
    }

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    let db_patient =
        praxis_db::repositories::patient::update_patient(&state.db_pool, id, &payload)
            .await
            .map_err(PraxisError::Database)?
            .ok_or_else(|| PraxisError::NotFound(format!("Patient with ID {} not found", id)))?;

    let patient = Patient::try_from(db_patient)?;
    Ok(Json(patient_response(patient)))
}

/// Query parameters for patient listings
#[derive(Debug, Deserialize)]
pub struct ListPatientsQuery {
    pub user_id: Option<Uuid>,
    pub status: Option<PatientStatus>,
    /// Case-insensitive substring match over first and last name
    pub search: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn patient_list_filter(query: &ListPatientsQuery) -> Option<Condition> {
    let mut conditions = Vec::new();

    if let Some(user_id) = query.user_id {
        conditions.push(Condition::eq("user_id", user_id));
    }
    if let Some(status) = query.status {
        conditions.push(Condition::eq("status", status.as_str()));
    }
    if let Some(search) = &query.search {
        conditions.push(Condition::Or(vec![
            Condition::contains("first_name", search.clone()),
            Condition::contains("last_name", search.clone()),
        ]));
    }
    if let Some(city) = &query.city {
        conditions.push(Condition::eq("city", city.as_str()));
    }
    if let Some(county) = &query.county {
        conditions.push(Condition::eq("county", county.as_str()));
    }

    if conditions.is_empty() {
        None
    } else {
        Some(Condition::And(conditions))
    }
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<Vec<PatientResponse>>, AppError> {
    let options = ListOptions {
        filter: patient_list_filter(&query),
        order_by: Some(("last_name".to_string(), SortDirection::Asc)),
        limit: query.limit,
        offset: query.offset,
    };

    let db_patients = praxis_db::repositories::patient::list_patients(&state.db_pool, &options)
        .await
        .map_err(PraxisError::Database)?;

    let mut patients = Vec::with_capacity(db_patients.len());
    for db_patient in db_patients {
        patients.push(patient_response(db_patient.try_into()?));
    }

    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn count_patients(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<PatientCountResponse>, AppError> {
    let filter = patient_list_filter(&query);

    let total = praxis_db::repositories::patient::count_patients(&state.db_pool, filter.as_ref())
        .await
        .map_err(PraxisError::Database)?;

    Ok(Json(PatientCountResponse { total }))
}
