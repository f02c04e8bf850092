// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly invoice queries and the billable-request selection that
//! feeds invoice generation.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use rinkside_domain::BookingStatus;

use crate::data_models::InvoiceData;
use crate::diesel_schema::{monthly_invoices, rental_requests};
use crate::error::PersistenceError;

/// Statuses that carry a billable amount once priced.
const BILLABLE_STATUSES: [&str; 2] = [
    BookingStatus::Approved.as_str(),
    BookingStatus::Admin.as_str(),
];

/// Diesel Queryable struct for invoice rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = monthly_invoices)]
struct InvoiceRow {
    invoice_id: i64,
    renter_id: i64,
    month: i32,
    year: i32,
    amount: f64,
    external_id: Option<String>,
    invoice_url: Option<String>,
    is_paid: i32,
    created_at: String,
}

impl InvoiceRow {
    fn into_data(self) -> InvoiceData {
        InvoiceData {
            invoice_id: self.invoice_id,
            renter_id: self.renter_id,
            month: self.month,
            year: self.year,
            amount: self.amount,
            external_id: self.external_id,
            invoice_url: self.invoice_url,
            is_paid: self.is_paid != 0,
            created_at: self.created_at,
        }
    }
}

/// Returns whether an invoice already exists for the renter and billing
/// month.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn invoice_exists(
    conn: &mut SqliteConnection,
    renter_id: i64,
    month: i32,
    year: i32,
) -> Result<bool, PersistenceError> {
    let count: i64 = monthly_invoices::table
        .filter(monthly_invoices::renter_id.eq(renter_id))
        .filter(monthly_invoices::month.eq(month))
        .filter(monthly_invoices::year.eq(year))
        .count()
        .get_result(conn)?;

    Ok(count > 0)
}

/// Retrieves an invoice by its external issuer ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no invoice carries the external ID.
pub fn get_invoice_by_external_id(
    conn: &mut SqliteConnection,
    external_id: &str,
) -> Result<Option<InvoiceData>, PersistenceError> {
    let result: Result<InvoiceRow, diesel::result::Error> = monthly_invoices::table
        .filter(monthly_invoices::external_id.eq(external_id))
        .select(InvoiceRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every monthly invoice, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_invoices(conn: &mut SqliteConnection) -> Result<Vec<InvoiceData>, PersistenceError> {
    let rows: Vec<InvoiceRow> = monthly_invoices::table
        .order((
            monthly_invoices::year.desc(),
            monthly_invoices::month.desc(),
        ))
        .select(InvoiceRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(InvoiceRow::into_data).collect())
}

/// Lists a renter's monthly invoices, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_invoices_for_renter(
    conn: &mut SqliteConnection,
    renter_id: i64,
) -> Result<Vec<InvoiceData>, PersistenceError> {
    let rows: Vec<InvoiceRow> = monthly_invoices::table
        .filter(monthly_invoices::renter_id.eq(renter_id))
        .order((
            monthly_invoices::year.desc(),
            monthly_invoices::month.desc(),
        ))
        .select(InvoiceRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(InvoiceRow::into_data).collect())
}

/// Finds the renters holding unpaid, priced, billable requests that
/// start inside the billing month.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `month_start` - First day of the billing month, `YYYY-MM-DD`
/// * `month_end` - Last day of the billing month, `YYYY-MM-DD`
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn renters_with_unpaid_requests(
    conn: &mut SqliteConnection,
    month_start: &str,
    month_end: &str,
) -> Result<Vec<i64>, PersistenceError> {
    debug!(
        "Finding renters with unpaid requests between {} and {}",
        month_start, month_end
    );

    let renter_ids: Vec<i64> = rental_requests::table
        .filter(rental_requests::status.eq_any(BILLABLE_STATUSES))
        .filter(rental_requests::is_paid.eq(0))
        .filter(rental_requests::amount.is_not_null())
        .filter(rental_requests::start_date.between(month_start, month_end))
        .select(rental_requests::renter_id)
        .distinct()
        .load(conn)?;

    Ok(renter_ids)
}

/// Sums a renter's unpaid, priced, billable requests starting inside
/// the billing month.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn unpaid_amount_for_month(
    conn: &mut SqliteConnection,
    renter_id: i64,
    month_start: &str,
    month_end: &str,
) -> Result<f64, PersistenceError> {
    let amounts: Vec<Option<f64>> = rental_requests::table
        .filter(rental_requests::renter_id.eq(renter_id))
        .filter(rental_requests::status.eq_any(BILLABLE_STATUSES))
        .filter(rental_requests::is_paid.eq(0))
        .filter(rental_requests::amount.is_not_null())
        .filter(rental_requests::start_date.between(month_start, month_end))
        .select(rental_requests::amount)
        .load(conn)?;

    Ok(amounts.into_iter().flatten().sum())
}
