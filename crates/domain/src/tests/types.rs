// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Booking, BookingKind, BookingStatus, DomainError, Occurrence, RecurrenceRule, TimeOfDay,
    format_date, parse_date,
};
use std::str::FromStr;
use time::macros::{date, time};

fn rental(status: Option<BookingStatus>) -> Booking {
    Booking {
        id: 1,
        kind: BookingKind::Rental,
        title: String::from("Stick and Puck"),
        description: String::from("Open practice"),
        start_date: date!(2024 - 06 - 01),
        end_date: date!(2024 - 06 - 01),
        start_time: TimeOfDay::from_time(time!(10:00:00)),
        end_time: TimeOfDay::from_time(time!(11:00:00)),
        status,
        is_recurring: false,
        recurrence_rule: None,
    }
}

#[test]
#[allow(clippy::expect_used)]
fn test_recurrence_rule_round_trip() {
    for raw in ["daily", "weekly", "monthly"] {
        let rule: RecurrenceRule =
            RecurrenceRule::from_str(raw).expect("known rule should parse");
        assert_eq!(rule.as_str(), raw);
        assert_eq!(format!("{rule}"), raw);
    }
}

#[test]
fn test_recurrence_rule_rejects_unknown() {
    let err = RecurrenceRule::from_str("yearly");
    assert_eq!(
        err,
        Err(DomainError::InvalidRecurrenceRule(String::from("yearly")))
    );
}

#[test]
#[allow(clippy::expect_used)]
fn test_booking_status_round_trip() {
    for raw in ["pending", "approved", "denied", "admin"] {
        let status: BookingStatus =
            BookingStatus::from_str(raw).expect("known status should parse");
        assert_eq!(status.as_str(), raw);
    }

    assert_eq!(
        BookingStatus::from_str("cancelled"),
        Err(DomainError::InvalidStatus(String::from("cancelled")))
    );
}

#[test]
fn test_booking_status_activity() {
    assert!(!BookingStatus::Pending.is_active());
    assert!(BookingStatus::Approved.is_active());
    assert!(!BookingStatus::Denied.is_active());
    assert!(BookingStatus::Admin.is_active());
}

#[test]
#[allow(clippy::expect_used)]
fn test_time_of_day_accepts_all_formats() {
    let from_db: TimeOfDay = TimeOfDay::parse("14:30:00").expect("HH:MM:SS should parse");
    let from_form: TimeOfDay = TimeOfDay::parse("14:30").expect("HH:MM should parse");
    let from_admin: TimeOfDay = TimeOfDay::parse("2:30 PM").expect("12-hour should parse");

    assert_eq!(from_db.value(), time!(14:30:00));
    assert_eq!(from_form.value(), time!(14:30:00));
    assert_eq!(from_admin.value(), time!(14:30:00));
}

#[test]
#[allow(clippy::expect_used)]
fn test_time_of_day_preserves_display_text() {
    let parsed: TimeOfDay = TimeOfDay::parse("2:30 pm").expect("lowercase meridiem should parse");
    assert_eq!(parsed.display(), "2:30 pm");
    assert_eq!(format!("{parsed}"), "2:30 pm");
}

#[test]
#[allow(clippy::expect_used)]
fn test_time_of_day_compares_on_value_not_text() {
    let twelve_hour: TimeOfDay = TimeOfDay::parse("2:00 PM").expect("should parse");
    let twenty_four_hour: TimeOfDay = TimeOfDay::parse("14:00:00").expect("should parse");
    let later: TimeOfDay = TimeOfDay::parse("15:00").expect("should parse");

    assert_eq!(twelve_hour, twenty_four_hour);
    assert!(twelve_hour < later);
}

#[test]
fn test_time_of_day_rejects_garbage() {
    assert_eq!(
        TimeOfDay::parse("soonish"),
        Err(DomainError::InvalidTime(String::from("soonish")))
    );
    assert_eq!(
        TimeOfDay::parse("25:00"),
        Err(DomainError::InvalidTime(String::from("25:00")))
    );
}

#[test]
#[allow(clippy::expect_used)]
fn test_parse_date_accepts_iso_and_us_formats() {
    assert_eq!(
        parse_date("2024-06-15").expect("ISO date should parse"),
        date!(2024 - 06 - 15)
    );
    assert_eq!(
        parse_date("06/15/2024").expect("US date should parse"),
        date!(2024 - 06 - 15)
    );
    assert_eq!(
        parse_date("next tuesday"),
        Err(DomainError::InvalidDate(String::from("next tuesday")))
    );
}

#[test]
fn test_format_date_is_iso() {
    assert_eq!(format_date(date!(2024 - 01 - 05)), "2024-01-05");
    assert_eq!(format_date(date!(2024 - 12 - 31)), "2024-12-31");
}

#[test]
fn test_rental_activity_follows_status() {
    assert!(!rental(Some(BookingStatus::Pending)).is_active());
    assert!(rental(Some(BookingStatus::Approved)).is_active());
    assert!(!rental(Some(BookingStatus::Denied)).is_active());
    assert!(rental(Some(BookingStatus::Admin)).is_active());
    assert!(!rental(None).is_active());
}

#[test]
fn test_admin_events_are_always_active() {
    let mut event: Booking = rental(None);
    event.kind = BookingKind::AdminEvent;
    assert!(event.is_active());
    assert_eq!(event.status_label(), "admin");
}

#[test]
fn test_status_label_for_rentals() {
    assert_eq!(rental(Some(BookingStatus::Approved)).status_label(), "approved");
    assert_eq!(rental(Some(BookingStatus::Denied)).status_label(), "denied");
    assert_eq!(rental(None).status_label(), "pending");
}

#[test]
#[allow(clippy::expect_used)]
fn test_occurrence_serializes_to_calendar_contract() {
    let occurrence: Occurrence = Occurrence {
        source_id: 7,
        title: String::from("Public Skate"),
        description: String::from("All ages"),
        time: String::from("10:00:00 - 11:30:00"),
        date: String::from("2024-06-15"),
        status: String::from("admin"),
        is_recurring: true,
        recurrence_rule: Some(RecurrenceRule::Weekly),
    };

    let json: serde_json::Value =
        serde_json::to_value(&occurrence).expect("occurrence should serialize");
    assert_eq!(json["id"], 7);
    assert_eq!(json["name"], "Public Skate");
    assert_eq!(json["isRecurring"], true);
    assert_eq!(json["recurrenceRule"], "weekly");
    assert_eq!(json["date"], "2024-06-15");
    assert_eq!(json["time"], "10:00:00 - 11:30:00");
}
