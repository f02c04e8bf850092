// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental request and admin event mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use rinkside_domain::{BookingStatus, ProposedBooking, RecurrenceRule, format_date};

use crate::backend;
use crate::diesel_schema::{admin_events, rental_requests};
use crate::error::PersistenceError;

fn rule_text(rule: Option<RecurrenceRule>) -> Option<&'static str> {
    rule.map(|r| r.as_str())
}

/// Inserts a rental request.
///
/// Dates are stored as ISO text; times keep the display text the
/// proposal carried.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `renter_id` - The owning renter
/// * `proposed` - The validated, conflict-checked proposal
/// * `status` - Initial status (`pending` for renter submissions,
///   `admin` for admin-created rentals)
/// * `amount` - Price, when the request is created already priced
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_rental_request(
    conn: &mut SqliteConnection,
    renter_id: i64,
    proposed: &ProposedBooking,
    status: BookingStatus,
    amount: Option<f64>,
) -> Result<i64, PersistenceError> {
    info!(
        renter_id,
        status = status.as_str(),
        "Inserting rental request '{}'",
        proposed.title
    );

    diesel::insert_into(rental_requests::table)
        .values((
            rental_requests::renter_id.eq(renter_id),
            rental_requests::rental_name.eq(&proposed.title),
            rental_requests::description.eq(&proposed.description),
            rental_requests::start_date.eq(format_date(proposed.start_date)),
            rental_requests::end_date.eq(format_date(proposed.end_date)),
            rental_requests::start_time.eq(proposed.start_time.display()),
            rental_requests::end_time.eq(proposed.end_time.display()),
            rental_requests::status.eq(status.as_str()),
            rental_requests::is_recurring.eq(i32::from(proposed.is_recurring)),
            rental_requests::recurrence_rule.eq(rule_text(proposed.recurrence_rule)),
            rental_requests::amount.eq(amount),
        ))
        .execute(conn)?;

    backend::get_last_insert_rowid(conn)
}

/// Inserts an admin event.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_admin_event(
    conn: &mut SqliteConnection,
    proposed: &ProposedBooking,
) -> Result<i64, PersistenceError> {
    info!("Inserting admin event '{}'", proposed.title);

    diesel::insert_into(admin_events::table)
        .values((
            admin_events::event_name.eq(&proposed.title),
            admin_events::description.eq(&proposed.description),
            admin_events::start_date.eq(format_date(proposed.start_date)),
            admin_events::end_date.eq(format_date(proposed.end_date)),
            admin_events::start_time.eq(proposed.start_time.display()),
            admin_events::end_time.eq(proposed.end_time.display()),
            admin_events::is_recurring.eq(i32::from(proposed.is_recurring)),
            admin_events::recurrence_rule.eq(rule_text(proposed.recurrence_rule)),
        ))
        .execute(conn)?;

    backend::get_last_insert_rowid(conn)
}

/// Rewrites an admin event's schedule fields.
///
/// # Errors
///
/// Returns an error if the event does not exist or the update fails.
pub fn update_admin_event(
    conn: &mut SqliteConnection,
    event_id: i64,
    proposed: &ProposedBooking,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(admin_events::table)
        .filter(admin_events::event_id.eq(event_id))
        .set((
            admin_events::event_name.eq(&proposed.title),
            admin_events::description.eq(&proposed.description),
            admin_events::start_date.eq(format_date(proposed.start_date)),
            admin_events::end_date.eq(format_date(proposed.end_date)),
            admin_events::start_time.eq(proposed.start_time.display()),
            admin_events::end_time.eq(proposed.end_time.display()),
            admin_events::is_recurring.eq(i32::from(proposed.is_recurring)),
            admin_events::recurrence_rule.eq(rule_text(proposed.recurrence_rule)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }
    Ok(())
}

/// Approves a request and records its price.
///
/// # Errors
///
/// Returns an error if the request does not exist or the update fails.
pub fn approve_request(
    conn: &mut SqliteConnection,
    request_id: i64,
    amount: f64,
) -> Result<(), PersistenceError> {
    info!(request_id, amount, "Approving rental request");

    let updated: usize = diesel::update(rental_requests::table)
        .filter(rental_requests::request_id.eq(request_id))
        .set((
            rental_requests::status.eq(BookingStatus::Approved.as_str()),
            rental_requests::amount.eq(Some(amount)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}

/// Declines a request, recording the reason when one is given.
///
/// # Errors
///
/// Returns an error if the request does not exist or the update fails.
pub fn decline_request(
    conn: &mut SqliteConnection,
    request_id: i64,
    reason: Option<&str>,
) -> Result<(), PersistenceError> {
    info!(request_id, "Declining rental request");

    let updated: usize = diesel::update(rental_requests::table)
        .filter(rental_requests::request_id.eq(request_id))
        .set((
            rental_requests::status.eq(BookingStatus::Denied.as_str()),
            rental_requests::decline_reason.eq(reason),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}

/// Updates a request's price.
///
/// # Errors
///
/// Returns an error if the request does not exist or the update fails.
pub fn update_request_amount(
    conn: &mut SqliteConnection,
    request_id: i64,
    amount: f64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(rental_requests::table)
        .filter(rental_requests::request_id.eq(request_id))
        .set(rental_requests::amount.eq(Some(amount)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}

/// Marks a request as paid.
///
/// # Errors
///
/// Returns an error if the request does not exist or the update fails.
pub fn mark_request_paid(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(rental_requests::table)
        .filter(rental_requests::request_id.eq(request_id))
        .set(rental_requests::is_paid.eq(1))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}

/// Deletes a rental request.
///
/// # Errors
///
/// Returns an error if the request does not exist or the delete fails.
pub fn delete_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(rental_requests::table)
        .filter(rental_requests::request_id.eq(request_id))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::RequestNotFound(request_id));
    }
    Ok(())
}

/// Deletes an admin event.
///
/// # Errors
///
/// Returns an error if the event does not exist or the delete fails.
pub fn delete_admin_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(admin_events::table)
        .filter(admin_events::event_id.eq(event_id))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }
    Ok(())
}
