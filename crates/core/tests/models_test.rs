use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, to_string};
use uuid::Uuid;

use praxis_core::models::{
    event::{
        CreateEventRequest, Event, EventKind, EventStatus, ProposeTimeRequest, ProposedTime,
    },
    patient::{CreatePatientRequest, Patient, PatientStatus},
    product::{NumericUpdate, Product, TagsUpdate, UpdateProductRequest},
    token::TokenType,
    user::{Role, User},
};

#[test]
fn test_patient_serialization() {
    let id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let patient = Patient {
        id,
        user_id,
        first_name: "Maria".to_string(),
        last_name: "Ionescu".to_string(),
        gender: Some("F".to_string()),
        dob: None,
        email: Some("maria@example.com".to_string()),
        phone: None,
        city: Some("Cluj-Napoca".to_string()),
        county: Some("Cluj".to_string()),
        status: PatientStatus::Active,
        sms_notifications: true,
        email_notifications: false,
        created_at: now,
        updated_at: now,
    };

    let json = to_string(&patient).expect("Failed to serialize patient");
    let deserialized: Patient = from_str(&json).expect("Failed to deserialize patient");

    assert_eq!(deserialized.id, patient.id);
    assert_eq!(deserialized.user_id, patient.user_id);
    assert_eq!(deserialized.status, PatientStatus::Active);
    assert_eq!(deserialized.full_name(), "Maria Ionescu");
}

#[test]
fn test_event_serialization() {
    let now = Utc::now();

    let event = Event {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: "Cleaning".to_string(),
        description: None,
        date: now,
        start_time: Some(now),
        end_time: Some(now + chrono::Duration::minutes(30)),
        all_day: false,
        kind: EventKind::Appointment,
        status: EventStatus::Created,
        patient_id: Some(Uuid::new_v4()),
        created_at: now,
        updated_at: now,
    };

    let json = to_string(&event).expect("Failed to serialize event");
    let deserialized: Event = from_str(&json).expect("Failed to deserialize event");

    assert_eq!(deserialized.id, event.id);
    assert_eq!(deserialized.kind, EventKind::Appointment);
    assert_eq!(deserialized.status, EventStatus::Created);
    assert_eq!(deserialized.patient_id, event.patient_id);
}

#[test]
fn test_proposed_time_serialization() {
    let now = Utc::now();

    let proposed = ProposedTime {
        id: Uuid::new_v4(),
        event_id: Uuid::new_v4(),
        date: now,
        start_time: Some(now),
        end_time: Some(now + chrono::Duration::minutes(45)),
        status: EventStatus::Created,
        notified: false,
        created_at: now,
        updated_at: now,
    };

    let json = to_string(&proposed).expect("Failed to serialize proposed time");
    let deserialized: ProposedTime = from_str(&json).expect("Failed to deserialize proposed time");

    assert_eq!(deserialized.event_id, proposed.event_id);
    assert_eq!(deserialized.notified, false);
}

#[test]
fn test_product_tags_roundtrip() {
    let now = Utc::now();

    let product = Product {
        id: Uuid::new_v4(),
        event_id: Uuid::new_v4(),
        name: "Whitening".to_string(),
        description: None,
        price: 250.0,
        price_max: Some(400.0),
        image: None,
        tags: vec!["cosmetic".to_string(), "elective".to_string()],
        is_deleted: false,
        created_at: now,
        updated_at: now,
    };

    let json = to_string(&product).expect("Failed to serialize product");
    let deserialized: Product = from_str(&json).expect("Failed to deserialize product");

    assert_eq!(deserialized.tags, product.tags);
    assert_eq!(deserialized.price_max, Some(400.0));
}

// Enum wire formats are SCREAMING_SNAKE_CASE, matching the stored values.

#[rstest]
#[case(PatientStatus::Active, "\"ACTIVE\"")]
#[case(PatientStatus::Inactive, "\"INACTIVE\"")]
fn test_patient_status_wire_format(#[case] status: PatientStatus, #[case] expected: &str) {
    assert_eq!(to_string(&status).unwrap(), expected);
    let parsed: PatientStatus = from_str(expected).unwrap();
    assert_eq!(parsed, status);
}

#[rstest]
#[case(EventStatus::Created, "CREATED")]
#[case(EventStatus::Confirmed, "CONFIRMED")]
#[case(EventStatus::Completed, "COMPLETED")]
#[case(EventStatus::Cancelled, "CANCELLED")]
#[case(EventStatus::Rescheduled, "RESCHEDULED")]
fn test_event_status_round_trips_through_strings(
    #[case] status: EventStatus,
    #[case] text: &str,
) {
    assert_eq!(status.as_str(), text);
    assert_eq!(text.parse::<EventStatus>().unwrap(), status);
}

#[rstest]
#[case(TokenType::Activation, "ACTIVATION")]
#[case(TokenType::PasswordReset, "PASSWORD_RESET")]
#[case(TokenType::MagicLink, "MAGIC_LINK")]
fn test_token_type_round_trips_through_strings(#[case] kind: TokenType, #[case] text: &str) {
    assert_eq!(kind.as_str(), text);
    assert_eq!(text.parse::<TokenType>().unwrap(), kind);
}

#[test]
fn test_undeclared_enum_values_are_rejected() {
    assert!("ARCHIVED".parse::<PatientStatus>().is_err());
    assert!("PENDING".parse::<EventStatus>().is_err());
    assert!("SESSION".parse::<TokenType>().is_err());
    assert!("HOLIDAY".parse::<EventKind>().is_err());
    assert!("ROOT".parse::<Role>().is_err());

    // Deserialization goes through the same closed sets
    assert!(from_str::<EventStatus>("\"PENDING\"").is_err());
    assert!(from_str::<Role>("\"ROOT\"").is_err());
}

#[test]
fn test_event_status_all_covers_every_variant() {
    assert_eq!(EventStatus::ALL.len(), 5);
    for status in EventStatus::ALL {
        assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
    }
}

#[rstest]
#[case("Dental cleaning", None, false)]
#[case("Day off", None, true)]
#[case("Root canal", Some("second molar"), false)]
fn test_create_event_request(
    #[case] title: &str,
    #[case] description: Option<&str>,
    #[case] all_day: bool,
) {
    let request = CreateEventRequest {
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.map(|d| d.to_string()),
        date: Utc::now(),
        start_time: None,
        end_time: None,
        all_day: Some(all_day),
        kind: None,
        patient_id: None,
    };

    let json = to_string(&request).expect("Failed to serialize create event request");
    let deserialized: CreateEventRequest =
        from_str(&json).expect("Failed to deserialize create event request");

    assert_eq!(deserialized.title, request.title);
    assert_eq!(deserialized.description, request.description);
    assert_eq!(deserialized.all_day, request.all_day);
}

#[test]
fn test_create_patient_request_omits_defaulted_fields() {
    // Only the required fields; the server fills status and notification
    // defaults on insert.
    let json = r#"{
        "user_id": "7f8d2a30-0fbe-4d7a-a87c-55382f4e5a17",
        "first_name": "Ion",
        "last_name": "Popescu"
    }"#;

    let request: CreatePatientRequest =
        from_str(json).expect("Failed to deserialize minimal create patient request");

    assert_eq!(request.first_name, "Ion");
    assert_eq!(request.status, None);
    assert_eq!(request.sms_notifications, None);
    assert_eq!(request.email_notifications, None);
}

#[test]
fn test_propose_time_request_roundtrip() {
    let now = Utc::now();
    let request = ProposeTimeRequest {
        date: now,
        start_time: Some(now),
        end_time: Some(now + chrono::Duration::minutes(30)),
    };

    let json = to_string(&request).expect("Failed to serialize propose time request");
    let deserialized: ProposeTimeRequest =
        from_str(&json).expect("Failed to deserialize propose time request");

    assert_eq!(deserialized.date, request.date);
    assert_eq!(deserialized.start_time, request.start_time);
}

#[test]
fn test_numeric_update_wire_format() {
    let update = NumericUpdate::Increment(25.0);
    assert_eq!(to_string(&update).unwrap(), r#"{"increment":25.0}"#);

    let parsed: NumericUpdate = from_str(r#"{"divide":2.0}"#).unwrap();
    assert_eq!(parsed, NumericUpdate::Divide(2.0));
}

#[test]
fn test_update_product_request_with_tag_push() {
    let json = r#"{
        "price": {"set": 300.0},
        "tags": {"push": "urgent"}
    }"#;

    let request: UpdateProductRequest =
        from_str(json).expect("Failed to deserialize update product request");

    assert_eq!(request.price, Some(NumericUpdate::Set(300.0)));
    assert_eq!(request.tags, Some(TagsUpdate::Push("urgent".to_string())));
    assert_eq!(request.name, None);
}

#[test]
fn test_user_serialization() {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        index: 42,
        name: "Dr. Radu".to_string(),
        email: "radu@praxis.example".to_string(),
        email_verified: Some(now),
        phone: None,
        role: Role::Admin,
        banned: false,
        created_at: now,
        updated_at: now,
    };

    let json = to_string(&user).expect("Failed to serialize user");
    let deserialized: User = from_str(&json).expect("Failed to deserialize user");

    assert_eq!(deserialized.index, 42);
    assert_eq!(deserialized.role, Role::Admin);
    assert_eq!(deserialized.email, user.email);
}
