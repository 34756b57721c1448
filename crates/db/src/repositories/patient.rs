use crate::filter::{push_count_clause, push_list_clauses, Condition, ListOptions};
use crate::models::DbPatient;
use chrono::Utc;
use eyre::Result;
use praxis_core::models::patient::{CreatePatientRequest, PatientStatus, UpdatePatientRequest};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

pub const PATIENT_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "first_name",
    "last_name",
    "gender",
    "dob",
    "email",
    "phone",
    "city",
    "county",
    "status",
    "sms_notifications",
    "email_notifications",
    "created_at",
    "updated_at",
];

const PATIENT_RETURNING: &str = "id, user_id, first_name, last_name, gender, dob, email, phone, \
     city, county, status, sms_notifications, email_notifications, created_at, updated_at";

pub async fn create_patient(
    pool: &Pool<Postgres>,
    request: &CreatePatientRequest,
) -> Result<DbPatient> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let status = request.status.unwrap_or(PatientStatus::Active);

    tracing::debug!(
        "Creating patient: id={}, user_id={}, name={} {}",
        id,
        request.user_id,
        request.first_name,
        request.last_name
    );

    let patient = sqlx::query_as::<_, DbPatient>(&format!(
        r#"
        INSERT INTO patients (id, user_id, first_name, last_name, gender, dob, email, phone,
                              city, county, status, sms_notifications, email_notifications,
                              created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
        RETURNING {PATIENT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(request.user_id)
    .bind(&request.first_name)
    .bind(&request.last_name)
    .bind(&request.gender)
    .bind(request.dob)
    .bind(&request.email)
    .bind(&request.phone)
    .bind(&request.city)
    .bind(&request.county)
    .bind(status.as_str())
    .bind(request.sms_notifications.unwrap_or(true))
    .bind(request.email_notifications.unwrap_or(true))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(patient)
}

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(&format!(
        r#"
        SELECT {PATIENT_RETURNING}
        FROM patients
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}

pub async fn update_patient(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdatePatientRequest,
) -> Result<Option<DbPatient>> {
    let Some(patient) = get_patient_by_id(pool, id).await? else {
        return Ok(None);
    };

    let status = request
        .status
        .map(|s| s.as_str().to_string())
        .unwrap_or(patient.status);
    let now = Utc::now();

    let updated = sqlx::query_as::<_, DbPatient>(&format!(
        r#"
        UPDATE patients
        SET first_name = $2, last_name = $3, gender = $4, dob = $5, email = $6, phone = $7,
            city = $8, county = $9, status = $10, sms_notifications = $11,
            email_notifications = $12, updated_at = $13
        WHERE id = $1
        RETURNING {PATIENT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(request.first_name.as_deref().unwrap_or(&patient.first_name))
    .bind(request.last_name.as_deref().unwrap_or(&patient.last_name))
    .bind(request.gender.as_deref().or(patient.gender.as_deref()))
    .bind(request.dob.or(patient.dob))
    .bind(request.email.as_deref().or(patient.email.as_deref()))
    .bind(request.phone.as_deref().or(patient.phone.as_deref()))
    .bind(request.city.as_deref().or(patient.city.as_deref()))
    .bind(request.county.as_deref().or(patient.county.as_deref()))
    .bind(status)
    .bind(
        request
            .sms_notifications
            .unwrap_or(patient.sms_notifications),
    )
    .bind(
        request
            .email_notifications
            .unwrap_or(patient.email_notifications),
    )
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

pub async fn list_patients(
    pool: &Pool<Postgres>,
    options: &ListOptions,
) -> Result<Vec<DbPatient>> {
    let mut qb = QueryBuilder::new(format!("SELECT {PATIENT_RETURNING} FROM patients"));
    push_list_clauses(&mut qb, options, PATIENT_COLUMNS)?;

    let patients = qb.build_query_as::<DbPatient>().fetch_all(pool).await?;
    Ok(patients)
}

pub async fn count_patients(pool: &Pool<Postgres>, filter: Option<&Condition>) -> Result<i64> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM patients");
    push_count_clause(&mut qb, filter, PATIENT_COLUMNS)?;

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}
