// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rinkside_domain::{ProposedBooking, RecurrenceRule, TimeOfDay, parse_date};

use crate::Persistence;

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database should initialize")
}

pub fn test_renter(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .create_renter(email, "Test Renter", Some("555-0100"), "hunter2!", false)
        .expect("renter should be created")
}

pub fn proposal(
    start_date: &str,
    end_date: &str,
    start_time: &str,
    end_time: &str,
    rule: Option<RecurrenceRule>,
) -> ProposedBooking {
    ProposedBooking {
        title: String::from("Test Rental"),
        description: String::from("test"),
        start_date: parse_date(start_date).expect("test date should parse"),
        end_date: parse_date(end_date).expect("test date should parse"),
        start_time: TimeOfDay::parse(start_time).expect("test time should parse"),
        end_time: TimeOfDay::parse(end_time).expect("test time should parse"),
        is_recurring: rule.is_some(),
        recurrence_rule: rule,
    }
}
