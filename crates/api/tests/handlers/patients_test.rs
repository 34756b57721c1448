use chrono::Utc;
use mockall::predicate;
use praxis_api::middleware::error_handling::AppError;
use praxis_core::{
    errors::PraxisError,
    models::patient::{CreatePatientRequest, Patient, PatientStatus},
};
use praxis_db::models::{DbEvent, DbPatient};
use uuid::Uuid;

use crate::test_utils::TestContext;

fn minimal_create_request(user_id: Uuid) -> CreatePatientRequest {
    CreatePatientRequest {
        user_id,
        first_name: "Ion".to_string(),
        last_name: "Popescu".to_string(),
        gender: None,
        dob: None,
        email: None,
        phone: None,
        city: None,
        county: None,
        status: None,
        sms_notifications: None,
        email_notifications: None,
    }
}

fn db_event(patient_id: Uuid) -> DbEvent {
    let now = Utc::now();
    DbEvent {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: "Checkup".to_string(),
        description: None,
        date: now,
        start_time: Some(now),
        end_time: Some(now + chrono::Duration::minutes(30)),
        all_day: false,
        kind: "APPOINTMENT".to_string(),
        status: "CREATED".to_string(),
        patient_id: Some(patient_id),
        created_at: now,
        updated_at: now,
    }
}

// Mirrors the create handler: defaulted columns come back populated from
// the insert.
async fn test_create_patient_wrapper(
    ctx: &mut TestContext,
    request: CreatePatientRequest,
) -> Result<Patient, AppError> {
    let row = ctx
        .patient_repo
        .create_patient(request)
        .await
        .map_err(PraxisError::Database)?;
    Ok(Patient::try_from(row)?)
}

#[tokio::test]
async fn test_create_patient_populates_defaults() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();

    // The repository fills server defaults: generated id, ACTIVE status,
    // notification flags on, created_at == updated_at.
    ctx.patient_repo
        .expect_create_patient()
        .returning(|request| {
            let now = Utc::now();
            Ok(DbPatient {
                id: Uuid::new_v4(),
                user_id: request.user_id,
                first_name: request.first_name,
                last_name: request.last_name,
                gender: request.gender,
                dob: request.dob,
                email: request.email,
                phone: request.phone,
                city: request.city,
                county: request.county,
                status: request
                    .status
                    .unwrap_or(PatientStatus::Active)
                    .as_str()
                    .to_string(),
                sms_notifications: request.sms_notifications.unwrap_or(true),
                email_notifications: request.email_notifications.unwrap_or(true),
                created_at: now,
                updated_at: now,
            })
        });

    let patient = test_create_patient_wrapper(&mut ctx, minimal_create_request(user_id))
        .await
        .expect("create should succeed");

    assert_eq!(patient.user_id, user_id);
    assert_eq!(patient.status, PatientStatus::Active);
    assert!(patient.sms_notifications);
    assert!(patient.email_notifications);
    assert_eq!(patient.created_at, patient.updated_at);
}

#[tokio::test]
async fn test_get_patient_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.patient_repo
        .expect_get_patient_by_id()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = ctx.patient_repo.get_patient_by_id(id).await.unwrap();
    let error = match result {
        Some(_) => panic!("expected no patient"),
        None => AppError(PraxisError::NotFound(format!(
            "Patient with ID {} not found",
            id
        ))),
    };

    match error.0 {
        PraxisError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_get_patient_with_appointments_include() {
    let mut ctx = TestContext::new();
    let patient_id = Uuid::new_v4();
    let now = Utc::now();

    ctx.patient_repo
        .expect_get_patient_by_id()
        .with(predicate::eq(patient_id))
        .returning(move |id| {
            Ok(Some(DbPatient {
                id,
                user_id: Uuid::new_v4(),
                first_name: "Maria".to_string(),
                last_name: "Ionescu".to_string(),
                gender: None,
                dob: None,
                email: None,
                phone: None,
                city: None,
                county: None,
                status: "ACTIVE".to_string(),
                sms_notifications: true,
                email_notifications: true,
                created_at: now,
                updated_at: now,
            }))
        });

    ctx.event_repo
        .expect_list_events()
        .returning(move |_| Ok(vec![db_event(patient_id), db_event(patient_id)]));

    // Simulates ?include=appointments: patient read plus its event list
    let patient = ctx
        .patient_repo
        .get_patient_by_id(patient_id)
        .await
        .unwrap()
        .expect("patient should exist");
    let events = ctx
        .event_repo
        .list_events(praxis_db::filter::ListOptions::default())
        .await
        .unwrap();

    assert_eq!(patient.status, "ACTIVE");
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.patient_id == Some(patient_id)));
}

#[tokio::test]
async fn test_undeclared_status_from_storage_is_rejected() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let now = Utc::now();

    // A row that somehow carries an undeclared status must not convert
    // into a domain patient.
    ctx.patient_repo
        .expect_get_patient_by_id()
        .returning(move |id| {
            Ok(Some(DbPatient {
                id,
                user_id: Uuid::new_v4(),
                first_name: "X".to_string(),
                last_name: "Y".to_string(),
                gender: None,
                dob: None,
                email: None,
                phone: None,
                city: None,
                county: None,
                status: "ARCHIVED".to_string(),
                sms_notifications: true,
                email_notifications: true,
                created_at: now,
                updated_at: now,
            }))
        });

    let row = ctx.patient_repo.get_patient_by_id(id).await.unwrap().unwrap();
    assert!(Patient::try_from(row).is_err());
}
