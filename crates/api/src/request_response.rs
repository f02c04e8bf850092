// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.

use serde::{Deserialize, Serialize};

use rinkside::ConflictSummary;
use rinkside_domain::{Occurrence, RecurrenceRule};
use rinkside_persistence::{
    AdminEventData, InvoiceData, RentalRequestData, RenterData, RequestWithRenter,
};

// ============================================================================
// Requests
// ============================================================================

/// Request to register a new renter account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRenterRequest {
    /// The account email; must be unique.
    pub email: String,
    /// The renter's display name.
    pub name: String,
    /// Optional contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// The plain-text password.
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// The account email.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// Request to update the caller's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// The new display name.
    pub name: String,
    /// The new contact phone, or `None` to clear it.
    #[serde(default)]
    pub phone: Option<String>,
}

/// A proposed booking as submitted over the wire.
///
/// Dates are accepted as `YYYY-MM-DD` or `MM/DD/YYYY`; times in 24-hour
/// or 12-hour clock form.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingPayload {
    /// The booking title.
    pub rental_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// First calendar date of the booking.
    pub start_date: String,
    /// Last calendar date of the booking, inclusive.
    pub end_date: String,
    /// Wall-clock start time.
    pub start_time: String,
    /// Wall-clock end time.
    pub end_time: String,
    /// Whether the booking repeats.
    #[serde(default)]
    pub is_recurring: bool,
    /// Recurrence rule: `daily`, `weekly`, or `monthly`.
    #[serde(default)]
    pub recurrence_rule: Option<String>,
}

/// Request to create a rental on behalf of a renter (admin).
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBookingRequest {
    /// The renter the booking is created for.
    pub renter_id: i64,
    /// The price charged for the booking.
    pub amount: f64,
    /// The booking itself.
    pub booking: BookingPayload,
}

/// Request to approve a rental request.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequestRequest {
    /// The price charged for the booking.
    pub amount: f64,
}

/// Request to decline a rental request.
#[derive(Debug, Clone, Deserialize)]
pub struct DeclineRequestRequest {
    /// Optional reason shown to the renter.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Request to re-price a rental request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAmountRequest {
    /// The new price.
    pub amount: f64,
}

/// Request to disable or re-enable a renter account (admin).
#[derive(Debug, Clone, Deserialize)]
pub struct SetRenterAccessRequest {
    /// `true` to disable the account, `false` to re-enable it.
    pub is_disabled: bool,
}

/// Query parameters for the admin renter search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRentersRequest {
    /// Name or email fragment to match.
    #[serde(default)]
    pub query: String,
}

/// Payment-provider notification that an invoice was paid.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotificationRequest {
    /// The provider-side invoice identifier.
    pub external_id: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Response to a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRenterResponse {
    /// The new renter's row identifier.
    pub renter_id: i64,
    /// The normalized account email.
    pub email: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent calls.
    pub session_token: String,
    /// The account email.
    pub email: String,
    /// The renter's display name.
    pub name: String,
    /// Whether the account holds the admin role.
    pub is_admin: bool,
    /// When the session expires, `YYYY-MM-DD HH:MM:SS` UTC.
    pub expires_at: String,
}

/// A renter's own profile view.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    /// The renter's row identifier.
    pub renter_id: i64,
    /// The account email.
    pub email: String,
    /// The renter's display name.
    pub name: String,
    /// Contact phone, if any.
    pub phone: Option<String>,
    /// Whether the account holds the admin role.
    pub is_admin: bool,
}

impl From<&RenterData> for ProfileResponse {
    fn from(renter: &RenterData) -> Self {
        Self {
            renter_id: renter.renter_id,
            email: renter.email.clone(),
            name: renter.name.clone(),
            phone: renter.phone.clone(),
            is_admin: renter.is_admin,
        }
    }
}

/// One renter in the admin account listing.
#[derive(Debug, Clone, Serialize)]
pub struct RenterInfo {
    /// The renter's row identifier.
    pub renter_id: i64,
    /// The account email.
    pub email: String,
    /// The renter's display name.
    pub name: String,
    /// Contact phone, if any.
    pub phone: Option<String>,
    /// Whether the account holds the admin role.
    pub is_admin: bool,
    /// Whether the account is disabled.
    pub is_disabled: bool,
}

impl From<RenterData> for RenterInfo {
    fn from(renter: RenterData) -> Self {
        Self {
            renter_id: renter.renter_id,
            email: renter.email,
            name: renter.name,
            phone: renter.phone,
            is_admin: renter.is_admin,
            is_disabled: renter.is_disabled,
        }
    }
}

/// Response listing renter accounts.
#[derive(Debug, Clone, Serialize)]
pub struct ListRentersResponse {
    /// All accounts, ordered by email.
    pub renters: Vec<RenterInfo>,
}

/// Response carrying the expanded calendar window.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarResponse {
    /// One entry per concrete occurrence.
    pub events: Vec<Occurrence>,
}

/// One booking that collides with a proposal.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictEntry {
    /// The colliding booking's identifier.
    pub id: i64,
    /// The colliding booking's title.
    pub name: String,
    /// Start date, `YYYY-MM-DD`.
    pub start_date: String,
    /// End date, `YYYY-MM-DD`.
    pub end_date: String,
    /// Start time, display form.
    pub start_time: String,
    /// End time, display form.
    pub end_time: String,
    /// Whether the colliding booking is recurring.
    pub is_recurring: bool,
    /// Recurrence rule, if any.
    pub recurrence_rule: Option<String>,
    /// The colliding booking's status label.
    pub status: String,
}

impl From<ConflictSummary> for ConflictEntry {
    fn from(summary: ConflictSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.title,
            start_date: summary.start_date,
            end_date: summary.end_date,
            start_time: summary.start_time,
            end_time: summary.end_time,
            is_recurring: summary.is_recurring,
            recurrence_rule: summary
                .recurrence_rule
                .map(|rule: RecurrenceRule| rule.as_str().to_string()),
            status: summary.status,
        }
    }
}

/// Response to the conflict pre-check.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictCheckResponse {
    /// Whether any collision was found.
    pub has_conflicts: bool,
    /// Colliding rental requests.
    pub rental_conflicts: Vec<ConflictEntry>,
    /// Colliding admin events.
    pub admin_conflicts: Vec<ConflictEntry>,
}

/// Response to a rental submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequestResponse {
    /// The new request's row identifier.
    pub request_id: i64,
    /// The stored status label.
    pub status: String,
}

/// Response to an admin event submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitEventResponse {
    /// The new event's row identifier.
    pub event_id: i64,
}

/// One rental request in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct RequestInfo {
    /// The request's row identifier.
    pub request_id: i64,
    /// The owning renter's row identifier.
    pub renter_id: i64,
    /// The booking title.
    pub rental_name: String,
    /// Free-form description.
    pub description: String,
    /// First calendar date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last calendar date, `YYYY-MM-DD`.
    pub end_date: String,
    /// Wall-clock start time, as stored.
    pub start_time: String,
    /// Wall-clock end time, as stored.
    pub end_time: String,
    /// Status label.
    pub status: String,
    /// Whether the booking repeats.
    pub is_recurring: bool,
    /// Recurrence rule, if any.
    pub recurrence_rule: Option<String>,
    /// The price charged, once set.
    pub amount: Option<f64>,
    /// Whether the request has been paid.
    pub is_paid: bool,
    /// The decline reason, if declined.
    pub decline_reason: Option<String>,
    /// Row creation timestamp.
    pub created_at: String,
    /// The owning renter's email; present in admin listings only.
    pub renter_email: Option<String>,
    /// The owning renter's name; present in admin listings only.
    pub renter_name: Option<String>,
}

impl From<RentalRequestData> for RequestInfo {
    fn from(data: RentalRequestData) -> Self {
        Self {
            request_id: data.request_id,
            renter_id: data.renter_id,
            rental_name: data.rental_name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            start_time: data.start_time,
            end_time: data.end_time,
            status: data.status,
            is_recurring: data.is_recurring,
            recurrence_rule: data.recurrence_rule,
            amount: data.amount,
            is_paid: data.is_paid,
            decline_reason: data.decline_reason,
            created_at: data.created_at,
            renter_email: None,
            renter_name: None,
        }
    }
}

impl From<RequestWithRenter> for RequestInfo {
    fn from(data: RequestWithRenter) -> Self {
        let mut info: Self = Self::from(data.request);
        info.renter_email = Some(data.renter_email);
        info.renter_name = Some(data.renter_name);
        info
    }
}

/// Response listing rental requests.
#[derive(Debug, Clone, Serialize)]
pub struct ListRequestsResponse {
    /// The matching requests, newest start date first.
    pub requests: Vec<RequestInfo>,
}

/// One admin event in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminEventInfo {
    /// The event's row identifier.
    pub event_id: i64,
    /// The event title.
    pub event_name: String,
    /// Free-form description.
    pub description: String,
    /// First calendar date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last calendar date, `YYYY-MM-DD`.
    pub end_date: String,
    /// Wall-clock start time, as stored.
    pub start_time: String,
    /// Wall-clock end time, as stored.
    pub end_time: String,
    /// Whether the event repeats.
    pub is_recurring: bool,
    /// Recurrence rule, if any.
    pub recurrence_rule: Option<String>,
}

impl From<AdminEventData> for AdminEventInfo {
    fn from(data: AdminEventData) -> Self {
        Self {
            event_id: data.event_id,
            event_name: data.event_name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            start_time: data.start_time,
            end_time: data.end_time,
            is_recurring: data.is_recurring,
            recurrence_rule: data.recurrence_rule,
        }
    }
}

/// Response listing admin events.
#[derive(Debug, Clone, Serialize)]
pub struct ListAdminEventsResponse {
    /// All admin events.
    pub events: Vec<AdminEventInfo>,
}

/// One monthly invoice in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceInfo {
    /// The invoice's row identifier.
    pub invoice_id: i64,
    /// The billed renter's row identifier.
    pub renter_id: i64,
    /// The billed month, 1-12.
    pub month: i32,
    /// The billed year.
    pub year: i32,
    /// The invoiced amount.
    pub amount: f64,
    /// Provider-side invoice identifier, if issued externally.
    pub external_id: Option<String>,
    /// Payment link, if issued externally.
    pub invoice_url: Option<String>,
    /// Whether the invoice has been paid.
    pub is_paid: bool,
    /// Row creation timestamp.
    pub created_at: String,
}

impl From<InvoiceData> for InvoiceInfo {
    fn from(data: InvoiceData) -> Self {
        Self {
            invoice_id: data.invoice_id,
            renter_id: data.renter_id,
            month: data.month,
            year: data.year,
            amount: data.amount,
            external_id: data.external_id,
            invoice_url: data.invoice_url,
            is_paid: data.is_paid,
            created_at: data.created_at,
        }
    }
}

/// Response listing monthly invoices.
#[derive(Debug, Clone, Serialize)]
pub struct ListInvoicesResponse {
    /// All invoices, newest billing month first.
    pub invoices: Vec<InvoiceInfo>,
}

/// Response to an invoice generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateInvoicesResponse {
    /// The billed month, 1-12.
    pub month: i32,
    /// The billed year.
    pub year: i32,
    /// Invoices created this run.
    pub created: usize,
    /// Renters skipped: already invoiced, nothing owed, or issuance
    /// failed.
    pub skipped: usize,
}
