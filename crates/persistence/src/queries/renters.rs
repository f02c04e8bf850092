// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Renter and session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{RenterData, SessionData};
use crate::diesel_schema::{renters, sessions};
use crate::error::PersistenceError;

/// Diesel Queryable struct for renter rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = renters)]
struct RenterRow {
    renter_id: i64,
    email: String,
    name: String,
    phone: Option<String>,
    password_hash: String,
    is_admin: i32,
    is_disabled: i32,
    created_at: String,
}

impl RenterRow {
    fn into_data(self) -> RenterData {
        RenterData {
            renter_id: self.renter_id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            password_hash: self.password_hash,
            is_admin: self.is_admin != 0,
            is_disabled: self.is_disabled != 0,
            created_at: self.created_at,
        }
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    renter_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl SessionRow {
    fn into_data(self) -> SessionData {
        SessionData {
            session_id: self.session_id,
            session_token: self.session_token,
            renter_id: self.renter_id,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
            expires_at: self.expires_at,
        }
    }
}

/// Retrieves a renter by email.
///
/// The email is normalized to lowercase for case-insensitive lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the renter is not found.
pub fn get_renter_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<RenterData>, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    debug!("Looking up renter by email: {}", normalized_email);

    let result: Result<RenterRow, diesel::result::Error> = renters::table
        .filter(renters::email.eq(&normalized_email))
        .select(RenterRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a renter by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the renter is not found.
pub fn get_renter_by_id(
    conn: &mut SqliteConnection,
    renter_id: i64,
) -> Result<Option<RenterData>, PersistenceError> {
    debug!("Looking up renter by ID: {}", renter_id);

    let result: Result<RenterRow, diesel::result::Error> = renters::table
        .filter(renters::renter_id.eq(renter_id))
        .select(RenterRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every renter, ordered by email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_renters(conn: &mut SqliteConnection) -> Result<Vec<RenterData>, PersistenceError> {
    let rows: Vec<RenterRow> = renters::table
        .order(renters::email.asc())
        .select(RenterRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(RenterRow::into_data).collect())
}

/// How many rows a renter search returns at most.
const SEARCH_RESULT_LIMIT: i64 = 10;

/// Searches renters whose name or email contains the needle, ordered
/// by name.
///
/// Matching uses SQLite `LIKE`, so ASCII case differences are ignored.
/// At most [`SEARCH_RESULT_LIMIT`] rows come back.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn search_renters(
    conn: &mut SqliteConnection,
    needle: &str,
) -> Result<Vec<RenterData>, PersistenceError> {
    let pattern: String = format!("%{}%", needle.trim());

    debug!("Searching renters matching: {}", pattern);

    let rows: Vec<RenterRow> = renters::table
        .filter(
            renters::name
                .like(&pattern)
                .or(renters::email.like(&pattern)),
        )
        .order(renters::name.asc())
        .limit(SEARCH_RESULT_LIMIT)
        .select(RenterRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(RenterRow::into_data).collect())
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    let result: Result<SessionRow, diesel::result::Error> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
