// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rinkside_domain::{
    Booking, BookingKind, BookingStatus, ProposedBooking, RecurrenceRule, TimeOfDay,
};
use time::Date;

pub fn tod(s: &str) -> TimeOfDay {
    TimeOfDay::parse(s).expect("test time should parse")
}

pub fn single_rental(
    id: i64,
    date: Date,
    start_time: &str,
    end_time: &str,
    status: BookingStatus,
) -> Booking {
    Booking {
        id,
        kind: BookingKind::Rental,
        title: format!("Rental {id}"),
        description: String::from("test rental"),
        start_date: date,
        end_date: date,
        start_time: tod(start_time),
        end_time: tod(end_time),
        status: Some(status),
        is_recurring: false,
        recurrence_rule: None,
    }
}

pub fn recurring_rental(
    id: i64,
    rule: RecurrenceRule,
    start_date: Date,
    end_date: Date,
    start_time: &str,
    end_time: &str,
    status: BookingStatus,
) -> Booking {
    Booking {
        id,
        kind: BookingKind::Rental,
        title: format!("Rental {id}"),
        description: String::from("test rental"),
        start_date,
        end_date,
        start_time: tod(start_time),
        end_time: tod(end_time),
        status: Some(status),
        is_recurring: true,
        recurrence_rule: Some(rule),
    }
}

pub fn admin_event(id: i64, date: Date, start_time: &str, end_time: &str) -> Booking {
    Booking {
        id,
        kind: BookingKind::AdminEvent,
        title: format!("Event {id}"),
        description: String::from("test event"),
        start_date: date,
        end_date: date,
        start_time: tod(start_time),
        end_time: tod(end_time),
        status: None,
        is_recurring: false,
        recurrence_rule: None,
    }
}

pub fn proposed_single(date: Date, start_time: &str, end_time: &str) -> ProposedBooking {
    ProposedBooking {
        title: String::from("Proposed"),
        description: String::from("test proposal"),
        start_date: date,
        end_date: date,
        start_time: tod(start_time),
        end_time: tod(end_time),
        is_recurring: false,
        recurrence_rule: None,
    }
}

pub fn proposed_recurring(
    rule: RecurrenceRule,
    start_date: Date,
    end_date: Date,
    start_time: &str,
    end_time: &str,
) -> ProposedBooking {
    ProposedBooking {
        title: String::from("Proposed"),
        description: String::from("test proposal"),
        start_date,
        end_date,
        start_time: tod(start_time),
        end_time: tod(end_time),
        is_recurring: true,
        recurrence_rule: Some(rule),
    }
}
