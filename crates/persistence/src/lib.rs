// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Rinkside scheduling system.
//!
//! This crate provides Diesel-on-`SQLite` storage for renters,
//! sessions, rental requests, admin events, and monthly invoices.
//! Migrations are embedded and run at connection time.
//!
//! In-memory databases are used for development and tests; file-based
//! databases (with WAL mode) for deployments. Foreign key enforcement
//! is verified at startup.
//!
//! Dates are stored as ISO `YYYY-MM-DD` text so SQL text comparison
//! matches chronological order. Clock times are stored as the display
//! text the caller supplied and are never reformatted; the domain layer
//! parses them for comparison.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use rinkside_domain::{Booking, BookingStatus, ProposedBooking};

pub mod backend;
pub mod data_models;
pub mod diesel_schema;
mod error;
pub mod mutations;
pub mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AdminEventData, InvoiceData, RentalRequestData, RenterData, RequestWithRenter, SessionData,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation without
    /// time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("rinkside_memdb_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or
    /// initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Renters & passwords
    // ========================================================================

    /// Creates a renter account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered or the
    /// insert fails.
    pub fn create_renter(
        &mut self,
        email: &str,
        name: &str,
        phone: Option<&str>,
        password: &str,
        is_admin: bool,
    ) -> Result<i64, PersistenceError> {
        mutations::renters::create_renter(&mut self.conn, email, name, phone, password, is_admin)
    }

    /// Retrieves a renter by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_renter_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<RenterData>, PersistenceError> {
        queries::renters::get_renter_by_email(&mut self.conn, email)
    }

    /// Retrieves a renter by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_renter_by_id(
        &mut self,
        renter_id: i64,
    ) -> Result<Option<RenterData>, PersistenceError> {
        queries::renters::get_renter_by_id(&mut self.conn, renter_id)
    }

    /// Lists every renter, ordered by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_renters(&mut self) -> Result<Vec<RenterData>, PersistenceError> {
        queries::renters::list_renters(&mut self.conn)
    }

    /// Searches renters by name or email substring, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn search_renters(&mut self, needle: &str) -> Result<Vec<RenterData>, PersistenceError> {
        queries::renters::search_renters(&mut self.conn, needle)
    }

    /// Updates a renter's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the renter does not exist or the update
    /// fails.
    pub fn update_renter_profile(
        &mut self,
        renter_id: i64,
        name: &str,
        phone: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::renters::update_renter_profile(&mut self.conn, renter_id, name, phone)
    }

    /// Sets or clears the disabled flag on a renter account.
    ///
    /// # Errors
    ///
    /// Returns an error if the renter does not exist or the update
    /// fails.
    pub fn set_renter_disabled(
        &mut self,
        renter_id: i64,
        is_disabled: bool,
    ) -> Result<(), PersistenceError> {
        mutations::renters::set_renter_disabled(&mut self.conn, renter_id, is_disabled)
    }

    /// Verifies an email/password pair.
    ///
    /// Returns the matching renter on success, `None` when the email is
    /// unknown or the password does not match. The two failure shapes
    /// are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or hash verification
    /// fails.
    pub fn verify_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<RenterData>, PersistenceError> {
        let Some(renter) = queries::renters::get_renter_by_email(&mut self.conn, email)? else {
            return Ok(None);
        };

        let matches: bool = bcrypt::verify(password, &renter.password_hash)
            .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))?;

        Ok(matches.then_some(renter))
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        renter_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, renter_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::renters::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id, now)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Selects the calendar candidates for a query window.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row cannot be
    /// mapped to a booking.
    pub fn calendar_candidates(
        &mut self,
        window_start: &str,
        window_end: &str,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::calendar_candidates(&mut self.conn, window_start, window_end)
    }

    /// Selects every booking the conflict gate compares against.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row cannot be
    /// mapped to a booking.
    pub fn active_bookings(&mut self) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::active_bookings(&mut self.conn)
    }

    /// Inserts a rental request.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_rental_request(
        &mut self,
        renter_id: i64,
        proposed: &ProposedBooking,
        status: BookingStatus,
        amount: Option<f64>,
    ) -> Result<i64, PersistenceError> {
        mutations::bookings::insert_rental_request(
            &mut self.conn,
            renter_id,
            proposed,
            status,
            amount,
        )
    }

    /// Inserts an admin event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_admin_event(
        &mut self,
        proposed: &ProposedBooking,
    ) -> Result<i64, PersistenceError> {
        mutations::bookings::insert_admin_event(&mut self.conn, proposed)
    }

    /// Rewrites an admin event's schedule fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or the update
    /// fails.
    pub fn update_admin_event(
        &mut self,
        event_id: i64,
        proposed: &ProposedBooking,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::update_admin_event(&mut self.conn, event_id, proposed)
    }

    /// Retrieves a rental request by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_request(
        &mut self,
        request_id: i64,
    ) -> Result<Option<RentalRequestData>, PersistenceError> {
        queries::bookings::get_request(&mut self.conn, request_id)
    }

    /// Lists a renter's own rental requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_requests_for_renter(
        &mut self,
        renter_id: i64,
    ) -> Result<Vec<RentalRequestData>, PersistenceError> {
        queries::bookings::list_requests_for_renter(&mut self.conn, renter_id)
    }

    /// Lists every rental request with renter contact fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_all_requests(&mut self) -> Result<Vec<RequestWithRenter>, PersistenceError> {
        queries::bookings::list_all_requests(&mut self.conn)
    }

    /// Retrieves an admin event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_admin_event(
        &mut self,
        event_id: i64,
    ) -> Result<Option<AdminEventData>, PersistenceError> {
        queries::bookings::get_admin_event(&mut self.conn, event_id)
    }

    /// Lists every admin event.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_admin_events(&mut self) -> Result<Vec<AdminEventData>, PersistenceError> {
        queries::bookings::list_admin_events(&mut self.conn)
    }

    /// Approves a request and records its price.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist or the update
    /// fails.
    pub fn approve_request(
        &mut self,
        request_id: i64,
        amount: f64,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::approve_request(&mut self.conn, request_id, amount)
    }

    /// Declines a request, recording the reason when one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist or the update
    /// fails.
    pub fn decline_request(
        &mut self,
        request_id: i64,
        reason: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::decline_request(&mut self.conn, request_id, reason)
    }

    /// Updates a request's price.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist or the update
    /// fails.
    pub fn update_request_amount(
        &mut self,
        request_id: i64,
        amount: f64,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::update_request_amount(&mut self.conn, request_id, amount)
    }

    /// Marks a request as paid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist or the update
    /// fails.
    pub fn mark_request_paid(&mut self, request_id: i64) -> Result<(), PersistenceError> {
        mutations::bookings::mark_request_paid(&mut self.conn, request_id)
    }

    /// Deletes a rental request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request does not exist or the delete
    /// fails.
    pub fn delete_request(&mut self, request_id: i64) -> Result<(), PersistenceError> {
        mutations::bookings::delete_request(&mut self.conn, request_id)
    }

    /// Deletes an admin event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist or the delete
    /// fails.
    pub fn delete_admin_event(&mut self, event_id: i64) -> Result<(), PersistenceError> {
        mutations::bookings::delete_admin_event(&mut self.conn, event_id)
    }

    // ========================================================================
    // Monthly invoices
    // ========================================================================

    /// Returns whether an invoice already exists for the renter and
    /// billing month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn invoice_exists(
        &mut self,
        renter_id: i64,
        month: i32,
        year: i32,
    ) -> Result<bool, PersistenceError> {
        queries::invoices::invoice_exists(&mut self.conn, renter_id, month, year)
    }

    /// Finds the renters holding unpaid billable requests in the
    /// billing month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn renters_with_unpaid_requests(
        &mut self,
        month_start: &str,
        month_end: &str,
    ) -> Result<Vec<i64>, PersistenceError> {
        queries::invoices::renters_with_unpaid_requests(&mut self.conn, month_start, month_end)
    }

    /// Sums a renter's unpaid billable requests in the billing month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn unpaid_amount_for_month(
        &mut self,
        renter_id: i64,
        month_start: &str,
        month_end: &str,
    ) -> Result<f64, PersistenceError> {
        queries::invoices::unpaid_amount_for_month(&mut self.conn, renter_id, month_start, month_end)
    }

    /// Records a monthly invoice for a renter.
    ///
    /// # Errors
    ///
    /// Returns an error if an invoice already exists for the renter and
    /// month, or if the insert fails.
    pub fn insert_invoice(
        &mut self,
        renter_id: i64,
        month: i32,
        year: i32,
        amount: f64,
        external_id: Option<&str>,
        invoice_url: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::invoices::insert_invoice(
            &mut self.conn,
            renter_id,
            month,
            year,
            amount,
            external_id,
            invoice_url,
        )
    }

    /// Retrieves an invoice by its external issuer ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_invoice_by_external_id(
        &mut self,
        external_id: &str,
    ) -> Result<Option<InvoiceData>, PersistenceError> {
        queries::invoices::get_invoice_by_external_id(&mut self.conn, external_id)
    }

    /// Lists every monthly invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_invoices(&mut self) -> Result<Vec<InvoiceData>, PersistenceError> {
        queries::invoices::list_invoices(&mut self.conn)
    }

    /// Lists a renter's monthly invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_invoices_for_renter(
        &mut self,
        renter_id: i64,
    ) -> Result<Vec<InvoiceData>, PersistenceError> {
        queries::invoices::list_invoices_for_renter(&mut self.conn, renter_id)
    }

    /// Marks an invoice paid, looked up by the issuer's identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no invoice carries the external ID or the
    /// update fails.
    pub fn mark_invoice_paid(&mut self, external_id: &str) -> Result<(), PersistenceError> {
        mutations::invoices::mark_invoice_paid(&mut self.conn, external_id)
    }

    /// Marks a renter's billable requests in the billing month as paid.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_requests_paid_for_month(
        &mut self,
        renter_id: i64,
        month_start: &str,
        month_end: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::invoices::mark_requests_paid_for_month(
            &mut self.conn,
            renter_id,
            month_start,
            month_end,
        )
    }
}
