use crate::filter::{push_count_clause, push_list_clauses, Condition, ListOptions};
use crate::models::{DbEvent, DbProposedTime};
use chrono::Utc;
use eyre::Result;
use praxis_core::models::event::{
    CreateEventRequest, EventKind, EventStatus, ProposeTimeRequest, UpdateEventRequest,
};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

pub const EVENT_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "title",
    "date",
    "start_time",
    "end_time",
    "all_day",
    "kind",
    "status",
    "patient_id",
    "created_at",
    "updated_at",
];

const EVENT_RETURNING: &str = "id, user_id, title, description, date, start_time, end_time, \
     all_day, kind, status, patient_id, created_at, updated_at";

pub async fn create_event(pool: &Pool<Postgres>, request: &CreateEventRequest) -> Result<DbEvent> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let kind = request.kind.unwrap_or(EventKind::Appointment);

    tracing::debug!(
        "Creating event: id={}, user_id={}, kind={}, patient={:?}",
        id,
        request.user_id,
        kind,
        request.patient_id
    );

    let event = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        INSERT INTO events (id, user_id, title, description, date, start_time, end_time,
                            all_day, kind, status, patient_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING {EVENT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(request.user_id)
    .bind(&request.title)
    .bind(&request.description)
    .bind(request.date)
    .bind(request.start_time)
    .bind(request.end_time)
    .bind(request.all_day.unwrap_or(false))
    .bind(kind.as_str())
    .bind(EventStatus::Created.as_str())
    .bind(request.patient_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

pub async fn get_event_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        SELECT {EVENT_RETURNING}
        FROM events
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn update_event(
    pool: &Pool<Postgres>,
    id: Uuid,
    request: &UpdateEventRequest,
) -> Result<Option<DbEvent>> {
    let Some(event) = get_event_by_id(pool, id).await? else {
        return Ok(None);
    };

    let status = request
        .status
        .map(|s| s.as_str().to_string())
        .unwrap_or(event.status);
    let now = Utc::now();

    let updated = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        UPDATE events
        SET title = $2, description = $3, date = $4, start_time = $5, end_time = $6,
            all_day = $7, status = $8, patient_id = $9, updated_at = $10
        WHERE id = $1
        RETURNING {EVENT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(request.title.as_deref().unwrap_or(&event.title))
    .bind(request.description.as_deref().or(event.description.as_deref()))
    .bind(request.date.unwrap_or(event.date))
    .bind(request.start_time.or(event.start_time))
    .bind(request.end_time.or(event.end_time))
    .bind(request.all_day.unwrap_or(event.all_day))
    .bind(status)
    .bind(request.patient_id.or(event.patient_id))
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

// Cancellation keeps the row; the calendar still shows cancelled slots.
pub async fn cancel_event(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEvent>> {
    let now = Utc::now();

    let event = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        UPDATE events
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {EVENT_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(EventStatus::Cancelled.as_str())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn list_events(pool: &Pool<Postgres>, options: &ListOptions) -> Result<Vec<DbEvent>> {
    let mut qb = QueryBuilder::new(format!("SELECT {EVENT_RETURNING} FROM events"));
    push_list_clauses(&mut qb, options, EVENT_COLUMNS)?;

    let events = qb.build_query_as::<DbEvent>().fetch_all(pool).await?;
    Ok(events)
}

pub async fn count_events(pool: &Pool<Postgres>, filter: Option<&Condition>) -> Result<i64> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM events");
    push_count_clause(&mut qb, filter, EVENT_COLUMNS)?;

    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

pub async fn count_events_by_status(
    pool: &Pool<Postgres>,
    filter: Option<&Condition>,
) -> Result<Vec<(String, i64)>> {
    let mut qb = QueryBuilder::new("SELECT status, COUNT(*) FROM events");
    push_count_clause(&mut qb, filter, EVENT_COLUMNS)?;
    qb.push(" GROUP BY status");

    let counts = qb
        .build_query_as::<(String, i64)>()
        .fetch_all(pool)
        .await?;
    Ok(counts)
}

// Proposed times (candidate reschedule slots)

const PROPOSED_RETURNING: &str =
    "id, event_id, date, start_time, end_time, status, notified, created_at, updated_at";

pub async fn create_proposed_time(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    request: &ProposeTimeRequest,
) -> Result<DbProposedTime> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let proposed = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        INSERT INTO proposed_times (id, event_id, date, start_time, end_time, status, notified,
                                    created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $7)
        RETURNING {PROPOSED_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(event_id)
    .bind(request.date)
    .bind(request.start_time)
    .bind(request.end_time)
    .bind(EventStatus::Created.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(proposed)
}

pub async fn get_proposed_time_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbProposedTime>> {
    let proposed = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        SELECT {PROPOSED_RETURNING}
        FROM proposed_times
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(proposed)
}

pub async fn list_proposed_times_by_event_id(
    pool: &Pool<Postgres>,
    event_id: Uuid,
) -> Result<Vec<DbProposedTime>> {
    let proposed = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        SELECT {PROPOSED_RETURNING}
        FROM proposed_times
        WHERE event_id = $1
        ORDER BY date ASC
        "#,
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(proposed)
}

pub async fn set_proposed_time_notified(
    pool: &Pool<Postgres>,
    id: Uuid,
    notified: bool,
) -> Result<Option<DbProposedTime>> {
    let now = Utc::now();

    let proposed = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        UPDATE proposed_times
        SET notified = $2, updated_at = $3
        WHERE id = $1
        RETURNING {PROPOSED_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(notified)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(proposed)
}

pub async fn decline_proposed_time(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbProposedTime>> {
    let now = Utc::now();

    let proposed = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        UPDATE proposed_times
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {PROPOSED_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(EventStatus::Cancelled.as_str())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(proposed)
}

// Accepting a proposal moves the event onto the proposed slot, confirms the
// proposal and cancels its still-pending siblings, all in one transaction.
pub async fn accept_proposed_time(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<(DbEvent, DbProposedTime)>> {
    let mut tx = pool.begin().await?;

    let Some(proposal) = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        SELECT {PROPOSED_RETURNING}
        FROM proposed_times
        WHERE id = $1
        FOR UPDATE
        "#,
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    let now = Utc::now();

    let event = sqlx::query_as::<_, DbEvent>(&format!(
        r#"
        UPDATE events
        SET date = $2, start_time = $3, end_time = $4, status = $5, updated_at = $6
        WHERE id = $1
        RETURNING {EVENT_RETURNING}
        "#,
    ))
    .bind(proposal.event_id)
    .bind(proposal.date)
    .bind(proposal.start_time)
    .bind(proposal.end_time)
    .bind(EventStatus::Rescheduled.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let confirmed = sqlx::query_as::<_, DbProposedTime>(&format!(
        r#"
        UPDATE proposed_times
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {PROPOSED_RETURNING}
        "#,
    ))
    .bind(id)
    .bind(EventStatus::Confirmed.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE proposed_times
        SET status = $3, updated_at = $4
        WHERE event_id = $1 AND id <> $2 AND status = $5
        "#,
    )
    .bind(proposal.event_id)
    .bind(id)
    .bind(EventStatus::Cancelled.as_str())
    .bind(now)
    .bind(EventStatus::Created.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Accepted proposed time {} for event {}",
        id,
        confirmed.event_id
    );

    Ok(Some((event, confirmed)))
}
