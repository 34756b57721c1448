use chrono::{Duration, Utc};
use mockall::predicate;
use praxis_core::models::event::{EventStatus, UpdateEventRequest};
use praxis_db::models::{DbEvent, DbProposedTime};
use uuid::Uuid;

use crate::test_utils::TestContext;

fn db_event(id: Uuid, status: &str) -> DbEvent {
    let now = Utc::now();
    DbEvent {
        id,
        user_id: Uuid::new_v4(),
        title: "Checkup".to_string(),
        description: None,
        date: now,
        start_time: Some(now),
        end_time: Some(now + Duration::minutes(30)),
        all_day: false,
        kind: "APPOINTMENT".to_string(),
        status: status.to_string(),
        patient_id: Some(Uuid::new_v4()),
        created_at: now,
        updated_at: now,
    }
}

fn db_proposed(id: Uuid, event_id: Uuid, status: &str) -> DbProposedTime {
    let now = Utc::now();
    DbProposedTime {
        id,
        event_id,
        date: now + Duration::days(2),
        start_time: Some(now + Duration::days(2)),
        end_time: Some(now + Duration::days(2) + Duration::minutes(30)),
        status: status.to_string(),
        notified: false,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_accept_proposed_time_reschedules_event() {
    let mut ctx = TestContext::new();
    let proposal_id = Uuid::new_v4();
    let event_id = Uuid::new_v4();

    // Acceptance confirms the proposal and moves the event onto its slot
    ctx.event_repo
        .expect_accept_proposed_time()
        .with(predicate::eq(proposal_id))
        .times(1)
        .returning(move |id| {
            let proposal = db_proposed(id, event_id, "CONFIRMED");
            let mut event = db_event(event_id, "RESCHEDULED");
            event.date = proposal.date;
            event.start_time = proposal.start_time;
            event.end_time = proposal.end_time;
            Ok(Some((event, proposal)))
        });

    let (event, proposal) = ctx
        .event_repo
        .accept_proposed_time(proposal_id)
        .await
        .unwrap()
        .expect("proposal should exist");

    assert_eq!(event.status, EventStatus::Rescheduled.as_str());
    assert_eq!(proposal.status, EventStatus::Confirmed.as_str());
    assert_eq!(event.date, proposal.date);
    assert_eq!(event.start_time, proposal.start_time);
    assert_eq!(event.end_time, proposal.end_time);
}

#[tokio::test]
async fn test_accept_missing_proposed_time_yields_none() {
    let mut ctx = TestContext::new();
    let proposal_id = Uuid::new_v4();

    ctx.event_repo
        .expect_accept_proposed_time()
        .with(predicate::eq(proposal_id))
        .returning(|_| Ok(None));

    let result = ctx.event_repo.accept_proposed_time(proposal_id).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_drag_reschedule_moves_start_and_end() {
    let mut ctx = TestContext::new();
    let event_id = Uuid::new_v4();
    let new_start = Utc::now() + Duration::days(1);
    let new_end = new_start + Duration::minutes(45);

    // The calendar drag mutation patches only the time fields
    let request = UpdateEventRequest {
        title: None,
        description: None,
        date: Some(new_start),
        start_time: Some(new_start),
        end_time: Some(new_end),
        all_day: None,
        status: None,
        patient_id: None,
    };

    ctx.event_repo
        .expect_update_event()
        .times(1)
        .returning(move |id, request| {
            let mut event = db_event(id, "CREATED");
            event.date = request.date.unwrap_or(event.date);
            event.start_time = request.start_time.or(event.start_time);
            event.end_time = request.end_time.or(event.end_time);
            Ok(Some(event))
        });

    let updated = ctx
        .event_repo
        .update_event(event_id, request)
        .await
        .unwrap()
        .expect("event should exist");

    assert_eq!(updated.start_time, Some(new_start));
    assert_eq!(updated.end_time, Some(new_end));
    assert_eq!(updated.date, new_start);
    // Title and status stay untouched on a pure reschedule
    assert_eq!(updated.title, "Checkup");
    assert_eq!(updated.status, "CREATED");
}

#[tokio::test]
async fn test_cancel_event_keeps_the_row() {
    let mut ctx = TestContext::new();
    let event_id = Uuid::new_v4();

    ctx.event_repo
        .expect_cancel_event()
        .with(predicate::eq(event_id))
        .returning(|id| Ok(Some(db_event(id, "CANCELLED"))));

    let cancelled = ctx
        .event_repo
        .cancel_event(event_id)
        .await
        .unwrap()
        .expect("event should exist");

    assert_eq!(cancelled.id, event_id);
    assert_eq!(cancelled.status, "CANCELLED");
}

#[tokio::test]
async fn test_count_events_by_status_covers_declared_statuses() {
    let mut ctx = TestContext::new();

    ctx.event_repo
        .expect_count_events_by_status()
        .returning(|_| {
            Ok(vec![
                ("CREATED".to_string(), 4),
                ("CONFIRMED".to_string(), 2),
                ("CANCELLED".to_string(), 1),
            ])
        });

    let counts = ctx.event_repo.count_events_by_status(None).await.unwrap();

    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    assert_eq!(total, 7);
    // Every reported bucket parses into the closed status set
    for (status, _) in counts {
        assert!(status.parse::<EventStatus>().is_ok());
    }
}

#[tokio::test]
async fn test_calendar_listing_is_scoped_and_ordered() {
    let mut ctx = TestContext::new();
    let user_id = Uuid::new_v4();
    let base = Utc::now();

    ctx.event_repo.expect_list_events().returning(move |_| {
        let mut first = db_event(Uuid::new_v4(), "CREATED");
        first.user_id = user_id;
        first.date = base;
        let mut second = db_event(Uuid::new_v4(), "CONFIRMED");
        second.user_id = user_id;
        second.date = base + Duration::hours(3);
        let mut day_off = db_event(Uuid::new_v4(), "CREATED");
        day_off.user_id = user_id;
        day_off.kind = "DAY_OFF".to_string();
        day_off.all_day = true;
        day_off.patient_id = None;
        day_off.date = base + Duration::days(1);
        Ok(vec![first, second, day_off])
    });

    let events = ctx
        .event_repo
        .list_events(praxis_db::filter::ListOptions::default())
        .await
        .unwrap();

    assert_eq!(events.len(), 3);
    assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    // Day-off blocks appear in the tenant calendar without a patient
    assert!(events.iter().any(|e| e.kind == "DAY_OFF" && e.patient_id.is_none()));
}
