// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rinkside_domain::{Booking, Occurrence, RecurrenceRule, format_date};
use time::{Date, Month};

/// Expands a set of bookings into concrete per-day occurrences.
///
/// Non-recurring bookings always yield exactly one occurrence on their
/// start date, even when that date lies outside the window; filtering
/// non-recurring rows is the caller's candidate-selection job, not the
/// expander's. Recurring bookings iterate from their own start date
/// (never shifted forward to `window_start`) up to
/// `min(end_date, window_end)` inclusive.
///
/// A recurring booking with no recurrence rule yields no occurrences.
///
/// # Arguments
///
/// * `bookings` - The candidate rows, already filtered by status and
///   coarse date range
/// * `_window_start` - The query window's lower bound; it only selects
///   candidate rows upstream and never moves a series' first occurrence
/// * `window_end` - The query window's upper bound, clipping every
///   recurring series
///
/// # Returns
///
/// A flat list of occurrences, in per-booking date order.
#[must_use]
pub fn expand(bookings: &[Booking], _window_start: Date, window_end: Date) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = Vec::new();
    for booking in bookings {
        if booking.is_recurring {
            expand_recurring(booking, window_end, &mut occurrences);
        } else {
            occurrences.push(occurrence_on(booking, booking.start_date));
        }
    }
    occurrences
}

fn expand_recurring(booking: &Booking, window_end: Date, out: &mut Vec<Occurrence>) {
    let effective_end: Date = booking.end_date.min(window_end);
    match booking.recurrence_rule {
        Some(RecurrenceRule::Daily) => {
            let mut cursor: Date = booking.start_date;
            while cursor <= effective_end {
                out.push(occurrence_on(booking, cursor));
                match cursor.next_day() {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }
        Some(RecurrenceRule::Weekly) => {
            // Step one day at a time and test the weekday rather than
            // jumping seven days; O(n) over the range but immune to
            // calendar edge cases.
            let target: time::Weekday = booking.start_date.weekday();
            let mut cursor: Date = booking.start_date;
            while cursor <= effective_end {
                if cursor.weekday() == target {
                    out.push(occurrence_on(booking, cursor));
                }
                match cursor.next_day() {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }
        Some(RecurrenceRule::Monthly) => {
            let original_day: u8 = booking.start_date.day();
            let mut cursor: Date = booking.start_date;
            while cursor <= effective_end {
                out.push(occurrence_on(booking, cursor));
                match next_month_clamped(cursor, original_day) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }
        // A recurring booking without a rule expands to nothing.
        None => {}
    }
}

/// Advances a monthly cursor by one calendar month, landing on
/// `original_day` clamped to the target month's last valid day. A series
/// started on the 31st visits the 30th (or 28th/29th) in shorter months
/// and returns to the 31st whenever the month allows it.
fn next_month_clamped(current: Date, original_day: u8) -> Option<Date> {
    let year: i32 = if current.month() == Month::December {
        current.year() + 1
    } else {
        current.year()
    };
    let month: Month = current.month().next();
    let day: u8 = original_day.min(month.length(year));
    Date::from_calendar_date(year, month, day).ok()
}

fn occurrence_on(booking: &Booking, date: Date) -> Occurrence {
    Occurrence {
        source_id: booking.id,
        title: booking.title.clone(),
        description: booking.description.clone(),
        time: format!("{} - {}", booking.start_time, booking.end_time),
        date: format_date(date),
        status: booking.status_label().to_string(),
        is_recurring: booking.is_recurring,
        recurrence_rule: booking.recurrence_rule,
    }
}
