// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, Month, OffsetDateTime};

use rinkside_domain::{BookingStatus, ProposedBooking, RecurrenceRule, TimeOfDay, format_date};
use rinkside_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{GenerateInvoicesResponse, PaymentNotificationRequest};
use crate::tests::helpers::{
    RecordingMailer, StubInvoiceIssuer, admin_actor, create_admin, register, renter_actor,
    test_persistence,
};

/// A date in the month the invoice run bills (the month before today).
fn billable_date() -> String {
    let today: Date = OffsetDateTime::now_utc().date();
    let (year, month): (i32, Month) = match today.month() {
        Month::January => (today.year() - 1, Month::December),
        month => (today.year(), month.previous()),
    };
    format_date(Date::from_calendar_date(year, month, 15).expect("mid-month date is valid"))
}

fn seed_unpaid_request(persistence: &mut Persistence, renter_id: i64, amount: f64) {
    let date: String = billable_date();
    let proposed: ProposedBooking = ProposedBooking {
        title: String::from("Billed Rental"),
        description: String::from("test"),
        start_date: rinkside_domain::parse_date(&date).expect("date should parse"),
        end_date: rinkside_domain::parse_date(&date).expect("date should parse"),
        start_time: TimeOfDay::parse("14:00:00").expect("time should parse"),
        end_time: TimeOfDay::parse("16:00:00").expect("time should parse"),
        is_recurring: false,
        recurrence_rule: None::<RecurrenceRule>,
    };
    persistence
        .insert_rental_request(renter_id, &proposed, BookingStatus::Approved, Some(amount))
        .expect("insert should succeed");
}

#[test]
fn test_generate_invoices_creates_then_skips() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let issuer: StubInvoiceIssuer = StubInvoiceIssuer::default();
    let mailer: RecordingMailer = RecordingMailer::default();

    seed_unpaid_request(&mut persistence, renter_id, 100.0);
    seed_unpaid_request(&mut persistence, renter_id, 50.0);

    let first: GenerateInvoicesResponse =
        handlers::generate_monthly_invoices(&mut persistence, &issuer, &mailer, &admin)
            .expect("invoice run should succeed");
    assert_eq!(first.created, 1);
    assert_eq!(first.skipped, 0);
    assert_eq!(mailer.sent_count(), 1);

    let invoices = handlers::list_invoices(&mut persistence, &admin)
        .expect("listing should succeed");
    assert_eq!(invoices.invoices.len(), 1);
    assert!((invoices.invoices[0].amount - 150.0).abs() < f64::EPSILON);
    assert_eq!(invoices.invoices[0].external_id.as_deref(), Some("ext_1"));
    assert!(!invoices.invoices[0].is_paid);

    // A second run finds the renter already invoiced.
    let second: GenerateInvoicesResponse =
        handlers::generate_monthly_invoices(&mut persistence, &issuer, &mailer, &admin)
            .expect("invoice run should succeed");
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 1);
}

#[test]
fn test_issuer_failure_skips_renter() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let issuer: StubInvoiceIssuer = StubInvoiceIssuer {
        fail: true,
        ..StubInvoiceIssuer::default()
    };
    let mailer: RecordingMailer = RecordingMailer::default();

    seed_unpaid_request(&mut persistence, renter_id, 100.0);

    let run: GenerateInvoicesResponse =
        handlers::generate_monthly_invoices(&mut persistence, &issuer, &mailer, &admin)
            .expect("invoice run should succeed");
    assert_eq!(run.created, 0);
    assert_eq!(run.skipped, 1);
    assert_eq!(mailer.sent_count(), 0);

    let invoices = handlers::list_invoices(&mut persistence, &admin)
        .expect("listing should succeed");
    assert!(invoices.invoices.is_empty());
}

#[test]
fn test_payment_notification_settles_invoice_and_requests() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let admin_id: i64 = create_admin(&mut persistence, "admin@example.com");
    let admin = admin_actor(admin_id, "admin@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let issuer: StubInvoiceIssuer = StubInvoiceIssuer::default();
    let mailer: RecordingMailer = RecordingMailer::default();

    seed_unpaid_request(&mut persistence, renter_id, 100.0);
    handlers::generate_monthly_invoices(&mut persistence, &issuer, &mailer, &admin)
        .expect("invoice run should succeed");

    handlers::payment_notification(
        &mut persistence,
        &PaymentNotificationRequest {
            external_id: String::from("ext_1"),
        },
    )
    .expect("notification should succeed");

    let invoices = handlers::list_invoices(&mut persistence, &admin)
        .expect("listing should succeed");
    assert!(invoices.invoices[0].is_paid);

    let mine = handlers::list_my_requests(&mut persistence, &renter)
        .expect("listing should succeed");
    assert!(mine.requests[0].is_paid);

    let unknown = handlers::payment_notification(
        &mut persistence,
        &PaymentNotificationRequest {
            external_id: String::from("ext_missing"),
        },
    );
    assert!(matches!(unknown, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_billing_requires_admin_role() {
    let mut persistence: Persistence = test_persistence();
    let renter_id: i64 = register(&mut persistence, "skater@example.com");
    let renter = renter_actor(renter_id, "skater@example.com");
    let issuer: StubInvoiceIssuer = StubInvoiceIssuer::default();
    let mailer: RecordingMailer = RecordingMailer::default();

    let run = handlers::generate_monthly_invoices(&mut persistence, &issuer, &mailer, &renter);
    assert!(matches!(run, Err(ApiError::Unauthorized { .. })));

    let listing = handlers::list_invoices(&mut persistence, &renter);
    assert!(matches!(listing, Err(ApiError::Unauthorized { .. })));
}
