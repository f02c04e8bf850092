// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Plain data carriers returned by the persistence layer.
//!
//! Rows come back with dates, times, statuses, and rules as the raw
//! text the database stores. The booking rows additionally convert into
//! the domain `Booking` shape the scheduling core consumes.

use std::str::FromStr;

use rinkside_domain::{
    Booking, BookingKind, BookingStatus, RecurrenceRule, TimeOfDay, parse_date,
};

use crate::error::PersistenceError;

/// A renter account row.
#[derive(Debug, Clone)]
pub struct RenterData {
    pub renter_id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_disabled: bool,
    pub created_at: String,
}

/// A session row.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub renter_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// A rental request row, fields as stored.
#[derive(Debug, Clone)]
pub struct RentalRequestData {
    pub request_id: i64,
    pub renter_id: i64,
    pub rental_name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub amount: Option<f64>,
    pub is_paid: bool,
    pub decline_reason: Option<String>,
    pub created_at: String,
}

/// An admin event row, fields as stored.
#[derive(Debug, Clone)]
pub struct AdminEventData {
    pub event_id: i64,
    pub event_name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub created_at: String,
}

/// A monthly invoice row.
#[derive(Debug, Clone)]
pub struct InvoiceData {
    pub invoice_id: i64,
    pub renter_id: i64,
    pub month: i32,
    pub year: i32,
    pub amount: f64,
    pub external_id: Option<String>,
    pub invoice_url: Option<String>,
    pub is_paid: bool,
    pub created_at: String,
}

/// A rental request joined with its renter's contact fields, for the
/// admin listing.
#[derive(Debug, Clone)]
pub struct RequestWithRenter {
    pub request: RentalRequestData,
    pub renter_email: String,
    pub renter_name: String,
}

/// Parses a stored rule string, mapping unknown text to `None`.
///
/// Stored rows with an unrecognized rule expand to zero occurrences
/// rather than failing the whole query; new submissions reject bad rule
/// strings at the boundary, so this only covers legacy rows.
fn stored_rule(raw: Option<&str>) -> Option<RecurrenceRule> {
    raw.and_then(|rule| RecurrenceRule::from_str(rule).ok())
}

impl RentalRequestData {
    /// Converts this row into the domain booking shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored dates, times, or status fail to
    /// parse.
    pub fn to_booking(&self) -> Result<Booking, PersistenceError> {
        Ok(Booking {
            id: self.request_id,
            kind: BookingKind::Rental,
            title: self.rental_name.clone(),
            description: self.description.clone(),
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            start_time: TimeOfDay::parse(&self.start_time)?,
            end_time: TimeOfDay::parse(&self.end_time)?,
            status: Some(BookingStatus::from_str(&self.status)?),
            is_recurring: self.is_recurring,
            recurrence_rule: stored_rule(self.recurrence_rule.as_deref()),
        })
    }
}

impl AdminEventData {
    /// Converts this row into the domain booking shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored dates or times fail to parse.
    pub fn to_booking(&self) -> Result<Booking, PersistenceError> {
        Ok(Booking {
            id: self.event_id,
            kind: BookingKind::AdminEvent,
            title: self.event_name.clone(),
            description: self.description.clone(),
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            start_time: TimeOfDay::parse(&self.start_time)?,
            end_time: TimeOfDay::parse(&self.end_time)?,
            status: None,
            is_recurring: self.is_recurring,
            recurrence_rule: stored_rule(self.recurrence_rule.as_deref()),
        })
    }
}
