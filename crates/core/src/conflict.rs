// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rinkside_domain::{
    Booking, BookingKind, ProposedBooking, RecurrenceRule, TimeOfDay, format_date,
};
use time::Date;

/// A display summary of one booking that collides with a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSummary {
    /// The colliding booking's identifier.
    pub id: i64,
    /// The colliding booking's title.
    pub title: String,
    /// Start date, rendered `YYYY-MM-DD`.
    pub start_date: String,
    /// End date, rendered `YYYY-MM-DD`.
    pub end_date: String,
    /// Start time, in the display format the row carried.
    pub start_time: String,
    /// End time, in the display format the row carried.
    pub end_time: String,
    /// Whether the colliding booking is recurring.
    pub is_recurring: bool,
    /// The colliding booking's recurrence rule, if any.
    pub recurrence_rule: Option<RecurrenceRule>,
    /// The colliding booking's status label.
    pub status: String,
}

impl ConflictSummary {
    fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            title: booking.title.clone(),
            start_date: format_date(booking.start_date),
            end_date: format_date(booking.end_date),
            start_time: booking.start_time.display().to_string(),
            end_time: booking.end_time.display().to_string(),
            is_recurring: booking.is_recurring,
            recurrence_rule: booking.recurrence_rule,
            status: booking.status_label().to_string(),
        }
    }
}

/// Every active booking a proposal collides with, grouped by kind.
///
/// The groups carry no ordering guarantee; the detector is an existence
/// predicate, not a ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    /// Colliding rental requests.
    pub rental_conflicts: Vec<ConflictSummary>,
    /// Colliding admin events.
    pub admin_conflicts: Vec<ConflictSummary>,
}

impl ConflictReport {
    /// Returns whether any collision was found.
    #[must_use]
    pub const fn has_conflicts(&self) -> bool {
        !self.rental_conflicts.is_empty() || !self.admin_conflicts.is_empty()
    }
}

/// Closed-interval overlap; touching boundaries count as overlapping.
fn times_overlap(
    a_start: &TimeOfDay,
    a_end: &TimeOfDay,
    b_start: &TimeOfDay,
    b_end: &TimeOfDay,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

fn dates_overlap(a_start: Date, a_end: Date, b_start: Date, b_end: Date) -> bool {
    a_start <= b_end && a_end >= b_start
}

fn same_weekday(a: Date, b: Date) -> bool {
    a.weekday() == b.weekday()
}

/// Pattern comparison for two recurring bookings whose horizons and
/// times already overlap. Daily on either side always collides. Two
/// weekly series collide only on matching weekdays. Every other
/// combination, monthly against monthly included, is conservatively
/// treated as a collision; a false positive here costs a rejected
/// request, a false negative costs a double-booked rink.
fn pattern_conflict(
    proposed: Option<RecurrenceRule>,
    existing: Option<RecurrenceRule>,
    proposed_start: Date,
    existing_start: Date,
) -> bool {
    match (proposed, existing) {
        (Some(RecurrenceRule::Daily), _) | (_, Some(RecurrenceRule::Daily)) => true,
        (Some(RecurrenceRule::Weekly), Some(RecurrenceRule::Weekly)) => {
            same_weekday(proposed_start, existing_start)
        }
        _ => true,
    }
}

/// The pairwise comparison both detector entry points share.
///
/// Four cases by recurring-ness of (proposed, existing). The single vs
/// recurring cases are mirror images: the single side's date must fall
/// inside the recurring side's horizon, and only a weekly recurring side
/// gets a weekday check. A daily or monthly series is treated as
/// covering every day of its horizon.
fn booking_conflicts(proposed: &ProposedBooking, existing: &Booking) -> bool {
    if !times_overlap(
        &proposed.start_time,
        &proposed.end_time,
        &existing.start_time,
        &existing.end_time,
    ) {
        return false;
    }

    match (proposed.is_recurring, existing.is_recurring) {
        (false, false) => dates_overlap(
            proposed.start_date,
            proposed.end_date,
            existing.start_date,
            existing.end_date,
        ),
        (false, true) => {
            existing.start_date <= proposed.start_date
                && proposed.start_date <= existing.end_date
                && (existing.recurrence_rule != Some(RecurrenceRule::Weekly)
                    || same_weekday(proposed.start_date, existing.start_date))
        }
        (true, false) => {
            proposed.start_date <= existing.start_date
                && existing.start_date <= proposed.end_date
                && (proposed.recurrence_rule != Some(RecurrenceRule::Weekly)
                    || same_weekday(existing.start_date, proposed.start_date))
        }
        (true, true) => {
            dates_overlap(
                proposed.start_date,
                proposed.end_date,
                existing.start_date,
                existing.end_date,
            ) && pattern_conflict(
                proposed.recurrence_rule,
                existing.recurrence_rule,
                proposed.start_date,
                existing.start_date,
            )
        }
    }
}

/// Returns whether a proposal collides with any active booking.
///
/// Pending and denied rentals never participate; approved rentals,
/// admin-priced rentals, and all admin events do. The filter lives here
/// so both entry points agree on what "active" means.
///
/// # Arguments
///
/// * `proposed` - The booking being submitted
/// * `bookings` - The stored bookings to compare against
///
/// # Returns
///
/// `true` if at least one active booking collides with the proposal.
#[must_use]
pub fn conflicts(proposed: &ProposedBooking, bookings: &[Booking]) -> bool {
    bookings
        .iter()
        .filter(|booking| booking.is_active())
        .any(|booking| booking_conflicts(proposed, booking))
}

/// Builds the full collision report for a proposal.
///
/// Same comparison semantics as [`conflicts`], but collects every
/// colliding booking instead of stopping at the first, grouped into
/// rental and admin-event lists for display.
#[must_use]
pub fn conflict_report(proposed: &ProposedBooking, bookings: &[Booking]) -> ConflictReport {
    let mut report: ConflictReport = ConflictReport::default();
    for existing in bookings.iter().filter(|booking| booking.is_active()) {
        if booking_conflicts(proposed, existing) {
            let summary: ConflictSummary = ConflictSummary::from_booking(existing);
            match existing.kind {
                BookingKind::Rental => report.rental_conflicts.push(summary),
                BookingKind::AdminEvent => report.admin_conflicts.push(summary),
            }
        }
    }
    report
}
