// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Rinkside scheduling system.
//!
//! This crate owns the request/response DTOs, session authentication
//! and role authorization, and the handler functions that compose the
//! persistence layer with the scheduling core. External email and
//! payment collaborators sit behind the narrow traits in [`external`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

pub mod auth;
pub mod error;
pub mod external;
pub mod handlers;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedRenter, AuthenticationService, AuthorizationService, Role};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use external::{
    ExternalServiceError, InvoiceIssuer, IssuedInvoice, LogMailer, Mailer, RecordOnlyInvoiceIssuer,
};
