// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Mutex;

use rinkside_persistence::Persistence;

use crate::auth::{AuthenticatedRenter, Role};
use crate::external::{ExternalServiceError, InvoiceIssuer, IssuedInvoice, Mailer};
use crate::handlers;
use crate::request_response::{BookingPayload, RegisterRenterRequest, RegisterRenterResponse};

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database should initialize")
}

/// Registers a renter through the handler and returns their id.
pub fn register(persistence: &mut Persistence, email: &str) -> i64 {
    let response: RegisterRenterResponse = handlers::register_renter(
        persistence,
        &RegisterRenterRequest {
            email: String::from(email),
            name: String::from("Test Renter"),
            phone: Some(String::from("555-0100")),
            password: String::from("hunter2!!"),
        },
    )
    .expect("registration should succeed");
    response.renter_id
}

/// Creates an admin account directly in the store and returns its id.
pub fn create_admin(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .create_renter(email, "Test Admin", None, "hunter2!!", true)
        .expect("admin should be created")
}

pub fn renter_actor(renter_id: i64, email: &str) -> AuthenticatedRenter {
    AuthenticatedRenter::new(renter_id, String::from(email), Role::Renter)
}

pub fn admin_actor(renter_id: i64, email: &str) -> AuthenticatedRenter {
    AuthenticatedRenter::new(renter_id, String::from(email), Role::Admin)
}

pub fn payload(
    start_date: &str,
    end_date: &str,
    start_time: &str,
    end_time: &str,
    rule: Option<&str>,
) -> BookingPayload {
    BookingPayload {
        rental_name: String::from("Test Rental"),
        description: String::from("test"),
        start_date: String::from(start_date),
        end_date: String::from(end_date),
        start_time: String::from(start_time),
        end_time: String::from(end_time),
        is_recurring: rule.is_some(),
        recurrence_rule: rule.map(String::from),
    }
}

/// A mailer that records every send.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    /// Recorded (recipient, subject) pairs.
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock should be clean").len()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, to: &str, subject: &str, _body: &str) -> Result<(), ExternalServiceError> {
        self.sent
            .lock()
            .expect("mailer lock should be clean")
            .push((String::from(to), String::from(subject)));
        Ok(())
    }
}

/// An issuer that fabricates sequential external ids, or fails on
/// demand.
#[derive(Debug, Default)]
pub struct StubInvoiceIssuer {
    pub fail: bool,
    pub issued: Mutex<Vec<(String, f64)>>,
}

impl InvoiceIssuer for StubInvoiceIssuer {
    fn issue(
        &self,
        recipient_email: &str,
        amount: f64,
        _memo: &str,
    ) -> Result<IssuedInvoice, ExternalServiceError> {
        if self.fail {
            return Err(ExternalServiceError::Invoice(String::from(
                "provider unavailable",
            )));
        }
        let mut issued = self.issued.lock().expect("issuer lock should be clean");
        issued.push((String::from(recipient_email), amount));
        let sequence: usize = issued.len();
        Ok(IssuedInvoice {
            external_id: Some(format!("ext_{sequence}")),
            invoice_url: Some(format!("https://pay.example.com/ext_{sequence}")),
        })
    }
}
