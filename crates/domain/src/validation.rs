// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ProposedBooking, format_date};
use time::Date;

/// Validates that a booking's date window is not reversed.
///
/// `start_date <= end_date` is the one date invariant the core relies on.
/// Degenerate *time* windows (`start_time >= end_time`) are deliberately
/// not rejected anywhere; they flow through expansion and overlap tests
/// without error.
///
/// # Errors
///
/// Returns `DomainError::DateRangeReversed` if `end` precedes `start`.
pub fn validate_date_window(start: Date, end: Date) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::DateRangeReversed {
            start: format_date(start),
            end: format_date(end),
        });
    }
    Ok(())
}

/// Validates a proposed booking before it reaches the conflict gate.
///
/// Checks the date window, requires a title, and requires a recurrence
/// rule when the booking is recurring. Unrecognized rule *strings* are
/// rejected earlier, at parse time; by this point the rule is either a
/// valid variant or absent.
///
/// # Errors
///
/// Returns an error if:
/// - The end date precedes the start date
/// - The title is empty
/// - The booking is recurring but carries no recurrence rule
pub fn validate_proposed_booking(proposed: &ProposedBooking) -> Result<(), DomainError> {
    validate_date_window(proposed.start_date, proposed.end_date)?;

    if proposed.title.trim().is_empty() {
        return Err(DomainError::EmptyField("rental_name"));
    }

    if proposed.is_recurring && proposed.recurrence_rule.is_none() {
        return Err(DomainError::MissingRecurrenceRule);
    }

    Ok(())
}
