use axum::http::StatusCode;
use axum::response::IntoResponse;
use praxis_api::middleware::error_handling::{conflict_or_db, AppError};
use praxis_core::errors::PraxisError;
use rstest::rstest;

fn status_of(err: PraxisError) -> StatusCode {
    AppError(err).into_response().status()
}

#[rstest]
#[case(PraxisError::NotFound("x".into()), StatusCode::NOT_FOUND)]
#[case(PraxisError::Validation("x".into()), StatusCode::BAD_REQUEST)]
#[case(PraxisError::Authentication("x".into()), StatusCode::UNAUTHORIZED)]
#[case(PraxisError::Authorization("x".into()), StatusCode::FORBIDDEN)]
#[case(PraxisError::Conflict("x".into()), StatusCode::CONFLICT)]
fn test_error_status_mapping(#[case] err: PraxisError, #[case] expected: StatusCode) {
    assert_eq!(status_of(err), expected);
}

#[test]
fn test_database_and_internal_errors_map_to_500() {
    assert_eq!(
        status_of(PraxisError::Database(eyre::eyre!("boom"))),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let inner: Box<dyn std::error::Error + Send + Sync> = "boom".into();
    assert_eq!(
        status_of(PraxisError::Internal(inner)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_report_conversion_wraps_as_database_error() {
    let err: AppError = eyre::eyre!("connection reset").into();
    assert!(matches!(err.0, PraxisError::Database(_)));
}

#[test]
fn test_conflict_or_db_falls_back_to_database_error() {
    // A plain report carries no unique-violation code, so it must not be
    // promoted to a conflict.
    let err = conflict_or_db(eyre::eyre!("timeout"), "duplicate row");
    assert!(matches!(err.0, PraxisError::Database(_)));
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
