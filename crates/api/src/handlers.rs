// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handler functions composing persistence, the scheduling core, and
//! the external collaborators.
//!
//! Handlers are synchronous and transport-agnostic; the server crate
//! maps them onto HTTP routes.

use std::str::FromStr;

use time::{Date, Duration, Month, OffsetDateTime};

use rinkside::{ConflictReport, conflict_report, conflicts, expand};
use rinkside_domain::{
    Booking, BookingStatus, Occurrence, ProposedBooking, RecurrenceRule, TimeOfDay, format_date,
    parse_date, validate_proposed_booking,
};
use rinkside_persistence::{
    AdminEventData, InvoiceData, Persistence, RentalRequestData, RenterData,
};

use crate::auth::{AuthenticatedRenter, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::external::{InvoiceIssuer, IssuedInvoice, Mailer};
use crate::request_response::{
    AdminBookingRequest, ApproveRequestRequest, BookingPayload, CalendarResponse,
    ConflictCheckResponse, ConflictEntry, DeclineRequestRequest, GenerateInvoicesResponse,
    ListAdminEventsResponse, ListInvoicesResponse, ListRentersResponse, ListRequestsResponse,
    LoginRequest, LoginResponse, PaymentNotificationRequest, ProfileResponse,
    RegisterRenterRequest, RegisterRenterResponse, SearchRentersRequest, SetRenterAccessRequest,
    SubmitEventResponse, SubmitRequestResponse, UpdateAmountRequest, UpdateProfileRequest,
};

/// How far back the calendar window reaches from today.
const CALENDAR_PAST: Duration = Duration::days(365);
/// How far forward the calendar window reaches from today.
const CALENDAR_FUTURE: Duration = Duration::days(180);

// ============================================================================
// Accounts & auth
// ============================================================================

/// Registers a new renter account.
///
/// # Errors
///
/// Returns an error if a field fails validation or the email is
/// already registered.
pub fn register_renter(
    persistence: &mut Persistence,
    request: &RegisterRenterRequest,
) -> Result<RegisterRenterResponse, ApiError> {
    let email: &str = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: String::from("a valid email address is required"),
        });
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("must not be empty"),
        });
    }
    if request.password.len() < 8 {
        return Err(ApiError::InvalidInput {
            field: String::from("password"),
            message: String::from("must be at least 8 characters"),
        });
    }

    let renter_id: i64 = persistence
        .create_renter(
            email,
            request.name.trim(),
            request.phone.as_deref(),
            &request.password,
            false,
        )
        .map_err(translate_persistence_error)?;

    Ok(RegisterRenterResponse {
        renter_id,
        email: email.to_lowercase(),
    })
}

/// Authenticates a renter and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the account is
/// disabled.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _actor, renter): (String, AuthenticatedRenter, RenterData) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    let expires_at: String = persistence
        .get_session_by_token(&session_token)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    Ok(LoginResponse {
        session_token,
        email: renter.email,
        name: renter.name,
        is_admin: renter.is_admin,
        expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the calling renter's profile.
#[must_use]
pub fn whoami(renter: &RenterData) -> ProfileResponse {
    ProfileResponse::from(renter)
}

/// Updates the calling renter's profile fields.
///
/// # Errors
///
/// Returns an error if the name is empty or the update fails.
pub fn update_profile(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    request: &UpdateProfileRequest,
) -> Result<ProfileResponse, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("must not be empty"),
        });
    }

    persistence
        .update_renter_profile(actor.renter_id, request.name.trim(), request.phone.as_deref())
        .map_err(translate_persistence_error)?;

    let renter: RenterData = persistence
        .get_renter_by_id(actor.renter_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Renter"),
            message: format!("No renter with id {}", actor.renter_id),
        })?;

    Ok(ProfileResponse::from(&renter))
}

/// Lists every renter account. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_renters(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
) -> Result<ListRentersResponse, ApiError> {
    AuthorizationService::authorize_manage_renters(actor)?;

    let renters: Vec<RenterData> = persistence
        .list_renters()
        .map_err(translate_persistence_error)?;

    Ok(ListRentersResponse {
        renters: renters.into_iter().map(Into::into).collect(),
    })
}

/// Searches renter accounts by name or email fragment. Admin only.
///
/// Fragments shorter than two characters return an empty listing
/// rather than matching every account.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn search_renters(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    request: &SearchRentersRequest,
) -> Result<ListRentersResponse, ApiError> {
    AuthorizationService::authorize_manage_renters(actor)?;

    let needle: &str = request.query.trim();
    if needle.chars().count() < 2 {
        return Ok(ListRentersResponse {
            renters: Vec::new(),
        });
    }

    let renters: Vec<RenterData> = persistence
        .search_renters(needle)
        .map_err(translate_persistence_error)?;

    Ok(ListRentersResponse {
        renters: renters.into_iter().map(Into::into).collect(),
    })
}

/// Disables or re-enables a renter account. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the renter does
/// not exist.
pub fn set_renter_access(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    renter_id: i64,
    request: &SetRenterAccessRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_renters(actor)?;

    persistence
        .set_renter_disabled(renter_id, request.is_disabled)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Calendar & conflict pre-check
// ============================================================================

/// Expands the calendar window into concrete occurrences.
///
/// The window spans one year back and 180 days forward from today.
/// Candidate rows are selected by the store's window predicate and run
/// through the occurrence expander; the flat list is returned as-is.
///
/// # Errors
///
/// Returns an error if the window arithmetic or the query fails.
pub fn calendar_events(persistence: &mut Persistence) -> Result<CalendarResponse, ApiError> {
    let today: Date = OffsetDateTime::now_utc().date();
    let window_start: Date = today.checked_sub(CALENDAR_PAST).ok_or_else(|| {
        ApiError::Internal {
            message: String::from("Calendar window start out of range"),
        }
    })?;
    let window_end: Date = today.checked_add(CALENDAR_FUTURE).ok_or_else(|| {
        ApiError::Internal {
            message: String::from("Calendar window end out of range"),
        }
    })?;

    let candidates: Vec<Booking> = persistence
        .calendar_candidates(&format_date(window_start), &format_date(window_end))
        .map_err(translate_persistence_error)?;

    let events: Vec<Occurrence> = expand(&candidates, window_start, window_end);

    Ok(CalendarResponse { events })
}

/// Runs the conflict detector against a proposed booking without
/// persisting anything.
///
/// # Errors
///
/// Returns an error if the payload fails parsing or validation, or the
/// query fails.
pub fn check_conflicts(
    persistence: &mut Persistence,
    payload: &BookingPayload,
) -> Result<ConflictCheckResponse, ApiError> {
    let proposed: ProposedBooking = parse_proposal(payload)?;
    let active: Vec<Booking> = active_bookings(persistence)?;

    let report: ConflictReport = conflict_report(&proposed, &active);

    Ok(ConflictCheckResponse {
        has_conflicts: report.has_conflicts(),
        rental_conflicts: report
            .rental_conflicts
            .into_iter()
            .map(ConflictEntry::from)
            .collect(),
        admin_conflicts: report
            .admin_conflicts
            .into_iter()
            .map(ConflictEntry::from)
            .collect(),
    })
}

// ============================================================================
// Booking workflow
// ============================================================================

/// Submits a rental request for the calling renter.
///
/// The proposal is validated, gated through the conflict detector
/// against all active bookings, and stored with status `pending`.
///
/// # Errors
///
/// Returns `ScheduleConflict` if the proposal collides with an active
/// booking; other errors follow parsing, validation, and storage.
pub fn submit_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    payload: &BookingPayload,
) -> Result<SubmitRequestResponse, ApiError> {
    let proposed: ProposedBooking = parse_proposal(payload)?;
    conflict_gate(persistence, &proposed)?;

    let request_id: i64 = persistence
        .insert_rental_request(actor.renter_id, &proposed, BookingStatus::Pending, None)
        .map_err(translate_persistence_error)?;

    Ok(SubmitRequestResponse {
        request_id,
        status: BookingStatus::Pending.as_str().to_string(),
    })
}

/// Creates an admin event. Admin only.
///
/// Admin events pass the same conflict gate as rentals.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the payload is
/// invalid, or the proposal collides with an active booking.
pub fn submit_admin_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    payload: &BookingPayload,
) -> Result<SubmitEventResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor)?;

    let proposed: ProposedBooking = parse_proposal(payload)?;
    conflict_gate(persistence, &proposed)?;

    let event_id: i64 = persistence
        .insert_admin_event(&proposed)
        .map_err(translate_persistence_error)?;

    Ok(SubmitEventResponse { event_id })
}

/// Creates a priced rental on behalf of a renter. Admin only.
///
/// The booking is stored with status `admin` (active immediately) and
/// the renter is notified by email.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the renter does not
/// exist, the payload is invalid, or the proposal collides with an
/// active booking.
pub fn submit_admin_booking(
    persistence: &mut Persistence,
    mailer: &dyn Mailer,
    actor: &AuthenticatedRenter,
    request: &AdminBookingRequest,
) -> Result<SubmitRequestResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor)?;

    let renter: RenterData = persistence
        .get_renter_by_id(request.renter_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Renter"),
            message: format!("No renter with id {}", request.renter_id),
        })?;

    let proposed: ProposedBooking = parse_proposal(&request.booking)?;
    conflict_gate(persistence, &proposed)?;

    let request_id: i64 = persistence
        .insert_rental_request(
            request.renter_id,
            &proposed,
            BookingStatus::Admin,
            Some(request.amount),
        )
        .map_err(translate_persistence_error)?;

    send_mail(
        mailer,
        &renter.email,
        "Ice time scheduled",
        &format!(
            "Hi {},\n\n'{}' has been scheduled for you starting {} at a rate of ${:.2}.\n",
            renter.name,
            proposed.title,
            format_date(proposed.start_date),
            request.amount,
        ),
    );

    Ok(SubmitRequestResponse {
        request_id,
        status: BookingStatus::Admin.as_str().to_string(),
    })
}

/// Approves a rental request and sets its price. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the request does
/// not exist.
pub fn approve_request(
    persistence: &mut Persistence,
    mailer: &dyn Mailer,
    actor: &AuthenticatedRenter,
    request_id: i64,
    request: &ApproveRequestRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_review_requests(actor)?;

    let stored: RentalRequestData = get_request_or_not_found(persistence, request_id)?;

    persistence
        .approve_request(request_id, request.amount)
        .map_err(translate_persistence_error)?;

    notify_owner(
        persistence,
        mailer,
        stored.renter_id,
        "Rental request approved",
        &format!(
            "Your request '{}' starting {} has been approved at a rate of ${:.2}.\n",
            stored.rental_name, stored.start_date, request.amount,
        ),
    );

    Ok(())
}

/// Declines a rental request. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the request does
/// not exist.
pub fn decline_request(
    persistence: &mut Persistence,
    mailer: &dyn Mailer,
    actor: &AuthenticatedRenter,
    request_id: i64,
    request: &DeclineRequestRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_review_requests(actor)?;

    let stored: RentalRequestData = get_request_or_not_found(persistence, request_id)?;

    persistence
        .decline_request(request_id, request.reason.as_deref())
        .map_err(translate_persistence_error)?;

    let reason_line: String = request
        .reason
        .as_deref()
        .map(|reason: &str| format!("\nReason: {reason}\n"))
        .unwrap_or_default();

    notify_owner(
        persistence,
        mailer,
        stored.renter_id,
        "Rental request declined",
        &format!(
            "Your request '{}' starting {} has been declined.\n{reason_line}",
            stored.rental_name, stored.start_date,
        ),
    );

    Ok(())
}

/// Re-prices a rental request. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the request does
/// not exist.
pub fn update_request_amount(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    request_id: i64,
    request: &UpdateAmountRequest,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_review_requests(actor)?;

    persistence
        .update_request_amount(request_id, request.amount)
        .map_err(translate_persistence_error)
}

/// Flags a rental request as paid. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the request does
/// not exist.
pub fn mark_request_paid(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    request_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_review_requests(actor)?;

    persistence
        .mark_request_paid(request_id)
        .map_err(translate_persistence_error)
}

/// Deletes a rental request.
///
/// Renters may delete their own requests; admins may delete any.
///
/// # Errors
///
/// Returns an error if the request does not exist or belongs to a
/// different renter and the actor is not an admin.
pub fn delete_request(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    request_id: i64,
) -> Result<(), ApiError> {
    let stored: RentalRequestData = get_request_or_not_found(persistence, request_id)?;

    if !actor.is_admin() && stored.renter_id != actor.renter_id {
        return Err(ApiError::Unauthorized {
            action: String::from("delete_request"),
            required_role: String::from("Admin"),
        });
    }

    persistence
        .delete_request(request_id)
        .map_err(translate_persistence_error)
}

/// Rewrites an admin event in place. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the payload is
/// invalid, or the event does not exist.
pub fn update_admin_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    event_id: i64,
    payload: &BookingPayload,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_schedule(actor)?;

    let proposed: ProposedBooking = parse_proposal(payload)?;

    persistence
        .update_admin_event(event_id, &proposed)
        .map_err(translate_persistence_error)
}

/// Deletes an admin event. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the event does not
/// exist.
pub fn delete_admin_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
    event_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_schedule(actor)?;

    persistence
        .delete_admin_event(event_id)
        .map_err(translate_persistence_error)
}

/// Lists every rental request with renter contact info. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_all_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
) -> Result<ListRequestsResponse, ApiError> {
    AuthorizationService::authorize_review_requests(actor)?;

    let requests = persistence
        .list_all_requests()
        .map_err(translate_persistence_error)?;

    Ok(ListRequestsResponse {
        requests: requests.into_iter().map(Into::into).collect(),
    })
}

/// Lists the calling renter's own requests.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_my_requests(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
) -> Result<ListRequestsResponse, ApiError> {
    let requests: Vec<RentalRequestData> = persistence
        .list_requests_for_renter(actor.renter_id)
        .map_err(translate_persistence_error)?;

    Ok(ListRequestsResponse {
        requests: requests.into_iter().map(Into::into).collect(),
    })
}

/// Lists every admin event. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_admin_events(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
) -> Result<ListAdminEventsResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor)?;

    let events: Vec<AdminEventData> = persistence
        .list_admin_events()
        .map_err(translate_persistence_error)?;

    Ok(ListAdminEventsResponse {
        events: events.into_iter().map(Into::into).collect(),
    })
}

// ============================================================================
// Monthly invoicing
// ============================================================================

/// Generates invoices for the previous calendar month. Admin only.
///
/// For each renter holding unpaid priced requests that started in the
/// month: skip if already invoiced, otherwise sum what is owed, issue
/// an invoice through the provider, record it, and email the renter.
/// A per-renter issuance failure skips that renter and continues.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a query fails.
pub fn generate_monthly_invoices(
    persistence: &mut Persistence,
    issuer: &dyn InvoiceIssuer,
    mailer: &dyn Mailer,
    actor: &AuthenticatedRenter,
) -> Result<GenerateInvoicesResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let today: Date = OffsetDateTime::now_utc().date();
    let (year, month): (i32, Month) = previous_month(today);
    let (month_start, month_end): (String, String) = month_bounds(year, month)?;
    let month_number: i32 = i32::from(u8::from(month));

    let renter_ids: Vec<i64> = persistence
        .renters_with_unpaid_requests(&month_start, &month_end)
        .map_err(translate_persistence_error)?;

    let mut created: usize = 0;
    let mut skipped: usize = 0;

    for renter_id in renter_ids {
        if persistence
            .invoice_exists(renter_id, month_number, year)
            .map_err(translate_persistence_error)?
        {
            skipped += 1;
            continue;
        }

        let amount: f64 = persistence
            .unpaid_amount_for_month(renter_id, &month_start, &month_end)
            .map_err(translate_persistence_error)?;
        if amount <= 0.0 {
            skipped += 1;
            continue;
        }

        let Some(renter) = persistence
            .get_renter_by_id(renter_id)
            .map_err(translate_persistence_error)?
        else {
            skipped += 1;
            continue;
        };

        let memo: String = format!("Ice rental for {month_number}/{year}");
        let issued: IssuedInvoice = match issuer.issue(&renter.email, amount, &memo) {
            Ok(issued) => issued,
            Err(e) => {
                tracing::warn!(renter_id, "Invoice issuance failed: {e}");
                skipped += 1;
                continue;
            }
        };

        persistence
            .insert_invoice(
                renter_id,
                month_number,
                year,
                amount,
                issued.external_id.as_deref(),
                issued.invoice_url.as_deref(),
            )
            .map_err(translate_persistence_error)?;

        let link_line: String = issued
            .invoice_url
            .as_deref()
            .map(|url: &str| format!("\nPay online: {url}\n"))
            .unwrap_or_default();
        send_mail(
            mailer,
            &renter.email,
            &format!("Your rink invoice for {month_number}/{year}"),
            &format!(
                "Hi {},\n\nYour invoice for {month_number}/{year} totals ${amount:.2}.\n{link_line}",
                renter.name,
            ),
        );

        created += 1;
    }

    tracing::info!(month_number, year, created, skipped, "Invoice run complete");

    Ok(GenerateInvoicesResponse {
        month: month_number,
        year,
        created,
        skipped,
    })
}

/// Applies a payment-provider notification.
///
/// Marks the matching invoice paid and settles the requests it
/// covered.
///
/// # Errors
///
/// Returns an error if no invoice carries the external id or the
/// updates fail.
pub fn payment_notification(
    persistence: &mut Persistence,
    request: &PaymentNotificationRequest,
) -> Result<(), ApiError> {
    let invoice: InvoiceData = persistence
        .get_invoice_by_external_id(&request.external_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Invoice"),
            message: format!("No invoice with external id '{}'", request.external_id),
        })?;

    let month: Month = u8::try_from(invoice.month)
        .ok()
        .and_then(|m: u8| Month::try_from(m).ok())
        .ok_or_else(|| ApiError::Internal {
            message: format!(
                "Invoice {} carries invalid month {}",
                invoice.invoice_id, invoice.month
            ),
        })?;
    let (month_start, month_end): (String, String) = month_bounds(invoice.year, month)?;

    persistence
        .mark_invoice_paid(&request.external_id)
        .map_err(translate_persistence_error)?;
    persistence
        .mark_requests_paid_for_month(invoice.renter_id, &month_start, &month_end)
        .map_err(translate_persistence_error)?;

    Ok(())
}

/// Lists every monthly invoice. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_invoices(
    persistence: &mut Persistence,
    actor: &AuthenticatedRenter,
) -> Result<ListInvoicesResponse, ApiError> {
    AuthorizationService::authorize_manage_billing(actor)?;

    let invoices: Vec<InvoiceData> = persistence
        .list_invoices()
        .map_err(translate_persistence_error)?;

    Ok(ListInvoicesResponse {
        invoices: invoices.into_iter().map(Into::into).collect(),
    })
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Parses and validates a wire payload into a typed proposal.
fn parse_proposal(payload: &BookingPayload) -> Result<ProposedBooking, ApiError> {
    let recurrence_rule: Option<RecurrenceRule> = match payload.recurrence_rule.as_deref() {
        None | Some("") => None,
        Some(text) => Some(RecurrenceRule::from_str(text).map_err(translate_domain_error)?),
    };

    let proposed: ProposedBooking = ProposedBooking {
        title: payload.rental_name.trim().to_string(),
        description: payload.description.clone(),
        start_date: parse_date(&payload.start_date).map_err(translate_domain_error)?,
        end_date: parse_date(&payload.end_date).map_err(translate_domain_error)?,
        start_time: TimeOfDay::parse(&payload.start_time).map_err(translate_domain_error)?,
        end_time: TimeOfDay::parse(&payload.end_time).map_err(translate_domain_error)?,
        is_recurring: payload.is_recurring,
        recurrence_rule,
    };

    validate_proposed_booking(&proposed).map_err(translate_domain_error)?;

    Ok(proposed)
}

fn active_bookings(persistence: &mut Persistence) -> Result<Vec<Booking>, ApiError> {
    persistence
        .active_bookings()
        .map_err(translate_persistence_error)
}

/// Rejects a proposal that collides with any active booking.
///
/// The check and the subsequent insert are not serialized in one
/// transaction; two racing submissions can both pass the gate.
fn conflict_gate(
    persistence: &mut Persistence,
    proposed: &ProposedBooking,
) -> Result<(), ApiError> {
    let active: Vec<Booking> = active_bookings(persistence)?;
    if conflicts(proposed, &active) {
        return Err(ApiError::ScheduleConflict {
            report: conflict_report(proposed, &active),
        });
    }
    Ok(())
}

fn get_request_or_not_found(
    persistence: &mut Persistence,
    request_id: i64,
) -> Result<RentalRequestData, ApiError> {
    persistence
        .get_request(request_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Rental request"),
            message: format!("No rental request with id {request_id}"),
        })
}

/// Sends a notification email; failures are logged, never fatal.
fn send_mail(mailer: &dyn Mailer, to: &str, subject: &str, body: &str) {
    if let Err(e) = mailer.send(to, subject, body) {
        tracing::warn!(to, "Failed to send notification email: {e}");
    }
}

/// Emails the owner of a request; a missing owner row is logged.
fn notify_owner(
    persistence: &mut Persistence,
    mailer: &dyn Mailer,
    renter_id: i64,
    subject: &str,
    body: &str,
) {
    match persistence.get_renter_by_id(renter_id) {
        Ok(Some(renter)) => send_mail(mailer, &renter.email, subject, body),
        Ok(None) => tracing::warn!(renter_id, "Request owner missing; notification dropped"),
        Err(e) => tracing::warn!(renter_id, "Failed to look up request owner: {e}"),
    }
}

fn previous_month(today: Date) -> (i32, Month) {
    match today.month() {
        Month::January => (today.year() - 1, Month::December),
        month => (today.year(), month.previous()),
    }
}

fn month_bounds(year: i32, month: Month) -> Result<(String, String), ApiError> {
    let first: Date =
        Date::from_calendar_date(year, month, 1).map_err(|e| ApiError::Internal {
            message: format!("Invalid billing month: {e}"),
        })?;
    let last: Date = Date::from_calendar_date(year, month, month.length(year)).map_err(|e| {
        ApiError::Internal {
            message: format!("Invalid billing month: {e}"),
        }
    })?;
    Ok((format_date(first), format_date(last)))
}
