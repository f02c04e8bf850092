// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Narrow traits for the external email and payment collaborators.
//!
//! Handlers compose against these traits so the server can wire real
//! providers while tests substitute recording stubs.

use thiserror::Error;

/// Failures reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalServiceError {
    /// Mail delivery failed.
    #[error("mail delivery failed: {0}")]
    Mail(String),
    /// Invoice issuance failed.
    #[error("invoice issuance failed: {0}")]
    Invoice(String),
}

/// Outbound email delivery.
pub trait Mailer: Send + Sync {
    /// Sends one plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ExternalServiceError>;
}

/// An invoice created by the external payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedInvoice {
    /// Provider-side invoice identifier, used to match payment
    /// notifications.
    pub external_id: Option<String>,
    /// Payment link for the renter.
    pub invoice_url: Option<String>,
}

/// Outbound invoice issuance.
pub trait InvoiceIssuer: Send + Sync {
    /// Issues an invoice to a renter for the given amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    fn issue(
        &self,
        recipient_email: &str,
        amount: f64,
        memo: &str,
    ) -> Result<IssuedInvoice, ExternalServiceError>;
}

/// A mailer that logs instead of sending.
///
/// Used when no mail provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), ExternalServiceError> {
        tracing::info!(to, subject, "Email suppressed; no mail provider configured");
        Ok(())
    }
}

/// An issuer that records invoices locally without an external provider.
///
/// Invoices issued this way carry no external id or payment link, so
/// payment notifications never match them; they are settled manually.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordOnlyInvoiceIssuer;

impl InvoiceIssuer for RecordOnlyInvoiceIssuer {
    fn issue(
        &self,
        recipient_email: &str,
        amount: f64,
        memo: &str,
    ) -> Result<IssuedInvoice, ExternalServiceError> {
        tracing::info!(
            recipient_email,
            amount,
            memo,
            "Invoice recorded locally; no payment provider configured"
        );
        Ok(IssuedInvoice {
            external_id: None,
            invoice_url: None,
        })
    }
}
