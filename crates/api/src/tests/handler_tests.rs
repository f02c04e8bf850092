// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

use rinkside_domain::format_date;
use rinkside_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{
    AdminBookingRequest, ApproveRequestRequest, CalendarResponse, ConflictCheckResponse,
    DeclineRequestRequest, ListRequestsResponse, SubmitRequestResponse, UpdateProfileRequest,
};
use crate::tests::helpers::{
    RecordingMailer, admin_actor, create_admin, payload, register, renter_actor, test_persistence,
};

#[test]
fn test_submit_request_and_listings() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");

    let response: SubmitRequestResponse = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
    )
    .expect("submission should succeed");
    assert_eq!(response.status, "pending");

    let mine: ListRequestsResponse =
        handlers::list_my_requests(&mut persistence, &renter).expect("listing should succeed");
    assert_eq!(mine.requests.len(), 1);
    assert_eq!(mine.requests[0].rental_name, "Test Rental");
    assert_eq!(mine.requests[0].renter_email, None);

    let all: ListRequestsResponse =
        handlers::list_all_requests(&mut persistence, &admin).expect("listing should succeed");
    assert_eq!(all.requests.len(), 1);
    assert_eq!(
        all.requests[0].renter_email.as_deref(),
        Some("skater@example.com")
    );

    assert!(handlers::list_all_requests(&mut persistence, &renter).is_err());
}

#[test]
fn test_conflict_gate_blocks_overlap_with_approved() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let mailer: RecordingMailer = RecordingMailer::default();

    let first: SubmitRequestResponse = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
    )
    .expect("submission should succeed");

    handlers::approve_request(
        &mut persistence,
        &mailer,
        &admin,
        first.request_id,
        &ApproveRequestRequest { amount: 150.0 },
    )
    .expect("approval should succeed");
    assert_eq!(mailer.sent_count(), 1);

    let overlapping = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "15:00:00", "17:00:00", None),
    );
    match overlapping {
        Err(ApiError::ScheduleConflict { report }) => {
            assert_eq!(report.rental_conflicts.len(), 1);
            assert!(report.admin_conflicts.is_empty());
        }
        other => panic!("Expected a schedule conflict, got {other:?}"),
    }
}

#[test]
fn test_pending_requests_do_not_block_submissions() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");

    handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
    )
    .expect("submission should succeed");

    // The first request is still pending, so it never participates in
    // the gate.
    handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
    )
    .expect("overlapping pending submissions are allowed");
}

#[test]
fn test_decline_request_records_reason() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let mailer: RecordingMailer = RecordingMailer::default();

    let submitted: SubmitRequestResponse = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
    )
    .expect("submission should succeed");

    handlers::decline_request(
        &mut persistence,
        &mailer,
        &admin,
        submitted.request_id,
        &DeclineRequestRequest {
            reason: Some(String::from("rink closed")),
        },
    )
    .expect("decline should succeed");

    let mine: ListRequestsResponse =
        handlers::list_my_requests(&mut persistence, &renter).expect("listing should succeed");
    assert_eq!(mine.requests[0].status, "denied");
    assert_eq!(
        mine.requests[0].decline_reason.as_deref(),
        Some("rink closed")
    );
    assert_eq!(mailer.sent_count(), 1);
}

#[test]
fn test_check_conflicts_endpoint_reports_admin_events() {
    let mut persistence: Persistence = test_persistence();
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");

    handlers::submit_admin_event(
        &mut persistence,
        &admin,
        &payload(
            "2024-06-01",
            "2024-08-31",
            "08:00:00",
            "09:00:00",
            Some("daily"),
        ),
    )
    .expect("event should be created");

    let colliding: ConflictCheckResponse = handlers::check_conflicts(
        &mut persistence,
        &payload("2024-07-04", "2024-07-04", "8:30 AM", "10:00 AM", None),
    )
    .expect("check should succeed");
    assert!(colliding.has_conflicts);
    assert_eq!(colliding.admin_conflicts.len(), 1);
    assert_eq!(colliding.admin_conflicts[0].name, "Test Rental");
    assert_eq!(colliding.admin_conflicts[0].status, "admin");
    assert_eq!(
        colliding.admin_conflicts[0].recurrence_rule.as_deref(),
        Some("daily")
    );

    let clear: ConflictCheckResponse = handlers::check_conflicts(
        &mut persistence,
        &payload("2024-07-04", "2024-07-04", "10:00:00", "11:00:00", None),
    )
    .expect("check should succeed");
    assert!(!clear.has_conflicts);
}

#[test]
fn test_admin_event_requires_admin_role() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");

    let result = handlers::submit_admin_event(
        &mut persistence,
        &renter,
        &payload("2024-06-01", "2024-06-01", "08:00:00", "09:00:00", None),
    );
    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_admin_booking_on_behalf_is_active_immediately() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let mailer: RecordingMailer = RecordingMailer::default();

    let response: SubmitRequestResponse = handlers::submit_admin_booking(
        &mut persistence,
        &mailer,
        &admin,
        &AdminBookingRequest {
            renter_id,
            amount: 200.0,
            booking: payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
        },
    )
    .expect("admin booking should succeed");
    assert_eq!(response.status, "admin");
    assert_eq!(mailer.sent_count(), 1);

    // The admin-created booking is active and blocks overlapping
    // submissions without any approval step.
    let blocked = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-10", "15:00:00", "16:00:00", None),
    );
    assert!(matches!(blocked, Err(ApiError::ScheduleConflict { .. })));
}

#[test]
fn test_delete_request_ownership() {
    let mut persistence: Persistence = test_persistence();
    let alice_id: i64 = register(&mut persistence, "alice@example.com");
    let bob_id: i64 = register(&mut persistence, "bob@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let alice = renter_actor(alice_id, "alice@example.com");
    let bob = renter_actor(bob_id, "bob@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");

    let submitted: SubmitRequestResponse = handlers::submit_request(
        &mut persistence,
        &alice,
        &payload("2024-06-10", "2024-06-10", "14:00:00", "16:00:00", None),
    )
    .expect("submission should succeed");

    let denied = handlers::delete_request(&mut persistence, &bob, submitted.request_id);
    assert!(matches!(denied, Err(ApiError::Unauthorized { .. })));

    handlers::delete_request(&mut persistence, &alice, submitted.request_id)
        .expect("owner delete should succeed");

    let missing = handlers::delete_request(&mut persistence, &admin, submitted.request_id);
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_admin_event_update_and_delete() {
    let mut persistence: Persistence = test_persistence();
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");

    let created = handlers::submit_admin_event(
        &mut persistence,
        &admin,
        &payload("2024-06-01", "2024-06-01", "08:00:00", "09:00:00", None),
    )
    .expect("event should be created");

    handlers::update_admin_event(
        &mut persistence,
        &admin,
        created.event_id,
        &payload("2024-06-02", "2024-06-02", "09:00:00", "10:00:00", None),
    )
    .expect("update should succeed");

    let events = handlers::list_admin_events(&mut persistence, &admin)
        .expect("listing should succeed");
    assert_eq!(events.events.len(), 1);
    assert_eq!(events.events[0].start_date, "2024-06-02");

    handlers::delete_admin_event(&mut persistence, &admin, created.event_id)
        .expect("delete should succeed");
    let missing = handlers::delete_admin_event(&mut persistence, &admin, created.event_id);
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_calendar_events_include_active_bookings() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let mailer: RecordingMailer = RecordingMailer::default();

    let today: String = format_date(OffsetDateTime::now_utc().date());

    let submitted: SubmitRequestResponse = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload(&today, &today, "14:00:00", "16:00:00", None),
    )
    .expect("submission should succeed");

    // Pending requests never show on the calendar.
    let before: CalendarResponse =
        handlers::calendar_events(&mut persistence).expect("calendar should succeed");
    assert!(before.events.is_empty());

    handlers::approve_request(
        &mut persistence,
        &mailer,
        &admin,
        submitted.request_id,
        &ApproveRequestRequest { amount: 100.0 },
    )
    .expect("approval should succeed");

    let after: CalendarResponse =
        handlers::calendar_events(&mut persistence).expect("calendar should succeed");
    assert_eq!(after.events.len(), 1);
    assert_eq!(after.events[0].date, today);
    assert_eq!(after.events[0].status, "approved");
}

#[test]
fn test_update_profile() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");

    let updated = handlers::update_profile(
        &mut persistence,
        &renter,
        &UpdateProfileRequest {
            name: String::from("New Name"),
            phone: Some(String::from("555-0199")),
        },
    )
    .expect("update should succeed");
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.phone.as_deref(), Some("555-0199"));

    let empty = handlers::update_profile(
        &mut persistence,
        &renter,
        &UpdateProfileRequest {
            name: String::from("   "),
            phone: None,
        },
    );
    assert!(matches!(empty, Err(ApiError::InvalidInput { field, .. }) if field == "name"));
}

#[test]
fn test_submit_rejects_malformed_payloads() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");

    let bad_date = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("June 10th", "2024-06-10", "14:00:00", "16:00:00", None),
    );
    assert!(matches!(bad_date, Err(ApiError::InvalidInput { field, .. }) if field == "date"));

    let reversed = handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("2024-06-10", "2024-06-01", "14:00:00", "16:00:00", None),
    );
    assert!(
        matches!(reversed, Err(ApiError::InvalidInput { field, .. }) if field == "end_date")
    );

    let mut missing_rule = payload("2024-06-10", "2024-08-10", "14:00:00", "16:00:00", None);
    missing_rule.is_recurring = true;
    let result = handlers::submit_request(&mut persistence, &renter, &missing_rule);
    assert!(
        matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "recurrence_rule")
    );

    // US-style dates are accepted.
    handlers::submit_request(
        &mut persistence,
        &renter,
        &payload("06/10/2024", "06/10/2024", "2:00 PM", "4:00 PM", None),
    )
    .expect("US-style dates should parse");
}
