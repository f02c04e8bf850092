// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly invoice mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use rinkside_domain::BookingStatus;

use crate::backend;
use crate::diesel_schema::{monthly_invoices, rental_requests};
use crate::error::PersistenceError;
use crate::queries;

/// Records a monthly invoice for a renter.
///
/// The `(renter, month, year)` triple is unique; generation skips
/// renters already invoiced, and this insert rejects duplicates that
/// slip past the pre-check.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `renter_id` - The invoiced renter
/// * `month` - Billing month, 1-12
/// * `year` - Billing year
/// * `amount` - Total unpaid amount covered by this invoice
/// * `external_id` - The issuer's invoice identifier
/// * `invoice_url` - The hosted payment link
///
/// # Errors
///
/// Returns an error if an invoice already exists for the renter and
/// month, or if the insert fails.
pub fn insert_invoice(
    conn: &mut SqliteConnection,
    renter_id: i64,
    month: i32,
    year: i32,
    amount: f64,
    external_id: Option<&str>,
    invoice_url: Option<&str>,
) -> Result<i64, PersistenceError> {
    if queries::invoices::invoice_exists(conn, renter_id, month, year)? {
        return Err(PersistenceError::InvoiceExists {
            renter_id,
            month,
            year,
        });
    }

    info!(renter_id, month, year, amount, "Recording monthly invoice");

    diesel::insert_into(monthly_invoices::table)
        .values((
            monthly_invoices::renter_id.eq(renter_id),
            monthly_invoices::month.eq(month),
            monthly_invoices::year.eq(year),
            monthly_invoices::amount.eq(amount),
            monthly_invoices::external_id.eq(external_id),
            monthly_invoices::invoice_url.eq(invoice_url),
        ))
        .execute(conn)?;

    backend::get_last_insert_rowid(conn)
}

/// Marks an invoice paid, looked up by the issuer's identifier.
///
/// # Errors
///
/// Returns an error if no invoice carries the external ID or the
/// update fails.
pub fn mark_invoice_paid(
    conn: &mut SqliteConnection,
    external_id: &str,
) -> Result<(), PersistenceError> {
    info!(external_id, "Marking invoice paid");

    let updated: usize = diesel::update(monthly_invoices::table)
        .filter(monthly_invoices::external_id.eq(external_id))
        .set(monthly_invoices::is_paid.eq(1))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::InvoiceNotFound(external_id.to_string()));
    }
    Ok(())
}

/// Marks a renter's billable requests in the billing month as paid.
///
/// Covers the same rows the invoice amount was summed over: unpaid,
/// priced, `approved`/`admin` requests starting inside the month.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_requests_paid_for_month(
    conn: &mut SqliteConnection,
    renter_id: i64,
    month_start: &str,
    month_end: &str,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(rental_requests::table)
        .filter(rental_requests::renter_id.eq(renter_id))
        .filter(rental_requests::status.eq_any([
            BookingStatus::Approved.as_str(),
            BookingStatus::Admin.as_str(),
        ]))
        .filter(rental_requests::is_paid.eq(0))
        .filter(rental_requests::amount.is_not_null())
        .filter(rental_requests::start_date.between(month_start, month_end))
        .set(rental_requests::is_paid.eq(1))
        .execute(conn)?;

    info!(renter_id, updated, "Marked covered requests paid");
    Ok(updated)
}
