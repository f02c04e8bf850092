// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rental request and admin event queries, including the candidate
//! selection feeding the scheduling core.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use rinkside_domain::{Booking, BookingStatus};

use crate::data_models::{AdminEventData, RentalRequestData, RequestWithRenter};
use crate::diesel_schema::{admin_events, rental_requests, renters};
use crate::error::PersistenceError;

/// Rental statuses that participate in the calendar and the conflict
/// gate.
const ACTIVE_STATUSES: [&str; 2] = [
    BookingStatus::Approved.as_str(),
    BookingStatus::Admin.as_str(),
];

/// Diesel Queryable struct for rental request rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rental_requests)]
struct RentalRequestRow {
    request_id: i64,
    renter_id: i64,
    rental_name: String,
    description: String,
    start_date: String,
    end_date: String,
    start_time: String,
    end_time: String,
    status: String,
    is_recurring: i32,
    recurrence_rule: Option<String>,
    amount: Option<f64>,
    is_paid: i32,
    decline_reason: Option<String>,
    created_at: String,
}

impl RentalRequestRow {
    fn into_data(self) -> RentalRequestData {
        RentalRequestData {
            request_id: self.request_id,
            renter_id: self.renter_id,
            rental_name: self.rental_name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            is_recurring: self.is_recurring != 0,
            recurrence_rule: self.recurrence_rule,
            amount: self.amount,
            is_paid: self.is_paid != 0,
            decline_reason: self.decline_reason,
            created_at: self.created_at,
        }
    }
}

/// Diesel Queryable struct for admin event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = admin_events)]
struct AdminEventRow {
    event_id: i64,
    event_name: String,
    description: String,
    start_date: String,
    end_date: String,
    start_time: String,
    end_time: String,
    is_recurring: i32,
    recurrence_rule: Option<String>,
    created_at: String,
}

impl AdminEventRow {
    fn into_data(self) -> AdminEventData {
        AdminEventData {
            event_id: self.event_id,
            event_name: self.event_name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_recurring: self.is_recurring != 0,
            recurrence_rule: self.recurrence_rule,
            created_at: self.created_at,
        }
    }
}

fn requests_to_bookings(rows: Vec<RentalRequestRow>) -> Result<Vec<Booking>, PersistenceError> {
    rows.into_iter()
        .map(|row| row.into_data().to_booking())
        .collect()
}

fn events_to_bookings(rows: Vec<AdminEventRow>) -> Result<Vec<Booking>, PersistenceError> {
    rows.into_iter()
        .map(|row| row.into_data().to_booking())
        .collect()
}

/// Selects the calendar candidates for a query window.
///
/// Active rentals plus all admin events, restricted by the window
/// predicate: a non-recurring row qualifies when its start date falls
/// inside the window; a recurring row qualifies when its horizon has not
/// ended before the window opens. Dates are ISO text, so lexicographic
/// comparison in SQL matches chronological order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `window_start` - Window lower bound, `YYYY-MM-DD`
/// * `window_end` - Window upper bound, `YYYY-MM-DD`
///
/// # Errors
///
/// Returns an error if a query fails or a stored row cannot be mapped
/// to a booking.
pub fn calendar_candidates(
    conn: &mut SqliteConnection,
    window_start: &str,
    window_end: &str,
) -> Result<Vec<Booking>, PersistenceError> {
    debug!(
        "Selecting calendar candidates for window {} to {}",
        window_start, window_end
    );

    let request_rows: Vec<RentalRequestRow> = rental_requests::table
        .filter(rental_requests::status.eq_any(ACTIVE_STATUSES))
        .filter(
            rental_requests::is_recurring
                .eq(0)
                .and(rental_requests::start_date.between(window_start, window_end))
                .or(rental_requests::is_recurring
                    .ne(0)
                    .and(rental_requests::end_date.ge(window_start))),
        )
        .select(RentalRequestRow::as_select())
        .load(conn)?;

    let event_rows: Vec<AdminEventRow> = admin_events::table
        .filter(
            admin_events::is_recurring
                .eq(0)
                .and(admin_events::start_date.between(window_start, window_end))
                .or(admin_events::is_recurring
                    .ne(0)
                    .and(admin_events::end_date.ge(window_start))),
        )
        .select(AdminEventRow::as_select())
        .load(conn)?;

    let mut bookings: Vec<Booking> = requests_to_bookings(request_rows)?;
    bookings.extend(events_to_bookings(event_rows)?);
    Ok(bookings)
}

/// Selects every booking the conflict gate compares against: all rental
/// requests in an active status plus all admin events, with no date
/// restriction.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row cannot be mapped
/// to a booking.
pub fn active_bookings(conn: &mut SqliteConnection) -> Result<Vec<Booking>, PersistenceError> {
    let request_rows: Vec<RentalRequestRow> = rental_requests::table
        .filter(rental_requests::status.eq_any(ACTIVE_STATUSES))
        .select(RentalRequestRow::as_select())
        .load(conn)?;

    let event_rows: Vec<AdminEventRow> = admin_events::table
        .select(AdminEventRow::as_select())
        .load(conn)?;

    let mut bookings: Vec<Booking> = requests_to_bookings(request_rows)?;
    bookings.extend(events_to_bookings(event_rows)?);
    Ok(bookings)
}

/// Retrieves a rental request by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the request is not found.
pub fn get_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<Option<RentalRequestData>, PersistenceError> {
    let result: Result<RentalRequestRow, diesel::result::Error> = rental_requests::table
        .filter(rental_requests::request_id.eq(request_id))
        .select(RentalRequestRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists a renter's own rental requests, newest start date first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_requests_for_renter(
    conn: &mut SqliteConnection,
    renter_id: i64,
) -> Result<Vec<RentalRequestData>, PersistenceError> {
    let rows: Vec<RentalRequestRow> = rental_requests::table
        .filter(rental_requests::renter_id.eq(renter_id))
        .order(rental_requests::start_date.desc())
        .select(RentalRequestRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(RentalRequestRow::into_data).collect())
}

/// Lists every rental request with the owning renter's contact fields,
/// for the admin review listing.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_all_requests(
    conn: &mut SqliteConnection,
) -> Result<Vec<RequestWithRenter>, PersistenceError> {
    let rows: Vec<(RentalRequestRow, String, String)> = rental_requests::table
        .inner_join(renters::table)
        .order(rental_requests::start_date.desc())
        .select((
            RentalRequestRow::as_select(),
            renters::email,
            renters::name,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(row, renter_email, renter_name)| RequestWithRenter {
            request: row.into_data(),
            renter_email,
            renter_name,
        })
        .collect())
}

/// Retrieves an admin event by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the event is not found.
pub fn get_admin_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<AdminEventData>, PersistenceError> {
    let result: Result<AdminEventRow, diesel::result::Error> = admin_events::table
        .filter(admin_events::event_id.eq(event_id))
        .select(AdminEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every admin event, newest start date first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_admin_events(
    conn: &mut SqliteConnection,
) -> Result<Vec<AdminEventData>, PersistenceError> {
    let rows: Vec<AdminEventRow> = admin_events::table
        .order(admin_events::start_date.desc())
        .select(AdminEventRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(AdminEventRow::into_data).collect())
}
