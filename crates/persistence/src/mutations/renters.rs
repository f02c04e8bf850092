// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Renter account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend;
use crate::diesel_schema::renters;
use crate::error::PersistenceError;
use crate::queries;

/// Creates a new renter account.
///
/// The email is normalized to lowercase for case-insensitive
/// uniqueness, and the password is hashed with bcrypt before storage.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The account email (will be normalized)
/// * `name` - The renter's display name
/// * `phone` - Optional contact phone
/// * `password` - The plain-text password (will be hashed)
/// * `is_admin` - Whether the account holds the admin role
///
/// # Errors
///
/// Returns an error if the email is already registered or the insert
/// fails.
pub fn create_renter(
    conn: &mut SqliteConnection,
    email: &str,
    name: &str,
    phone: Option<&str>,
    password: &str,
    is_admin: bool,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    if queries::renters::get_renter_by_email(conn, &normalized_email)?.is_some() {
        return Err(PersistenceError::RenterExists(normalized_email));
    }

    info!(
        "Creating renter with email: {}, is_admin: {}",
        normalized_email, is_admin
    );

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(renters::table)
        .values((
            renters::email.eq(&normalized_email),
            renters::name.eq(name),
            renters::phone.eq(phone),
            renters::password_hash.eq(&password_hash),
            renters::is_admin.eq(i32::from(is_admin)),
        ))
        .execute(conn)?;

    let renter_id: i64 = backend::get_last_insert_rowid(conn)?;

    info!(renter_id, "Renter created successfully");

    Ok(renter_id)
}

/// Updates a renter's profile fields.
///
/// # Errors
///
/// Returns an error if the renter does not exist or the update fails.
pub fn update_renter_profile(
    conn: &mut SqliteConnection,
    renter_id: i64,
    name: &str,
    phone: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(renters::table)
        .filter(renters::renter_id.eq(renter_id))
        .set((renters::name.eq(name), renters::phone.eq(phone)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RenterNotFound(renter_id));
    }
    Ok(())
}

/// Sets or clears the disabled flag on a renter account.
///
/// Disabled accounts cannot log in and existing sessions are rejected
/// at validation time.
///
/// # Errors
///
/// Returns an error if the renter does not exist or the update fails.
pub fn set_renter_disabled(
    conn: &mut SqliteConnection,
    renter_id: i64,
    is_disabled: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(renters::table)
        .filter(renters::renter_id.eq(renter_id))
        .set(renters::is_disabled.eq(i32::from(is_disabled)))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::RenterNotFound(renter_id));
    }

    info!(renter_id, is_disabled, "Renter access updated");

    Ok(())
}
