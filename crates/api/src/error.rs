// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use rinkside::ConflictReport;
use rinkside_domain::DomainError;
use rinkside_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the
/// API contract. Lower-layer errors are translated, never leaked raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The proposed booking collides with existing active bookings.
    ScheduleConflict {
        /// Every colliding booking, grouped by kind.
        report: ConflictReport,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ScheduleConflict { report } => {
                let count: usize =
                    report.rental_conflicts.len() + report.admin_conflicts.len();
                write!(
                    f,
                    "Schedule conflict: {count} existing booking(s) overlap the requested time"
                )
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidDate(value) => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("'{value}' is not a recognized date"),
        },
        DomainError::InvalidTime(value) => ApiError::InvalidInput {
            field: String::from("time"),
            message: format!("'{value}' is not a recognized time"),
        },
        DomainError::InvalidRecurrenceRule(value) => ApiError::InvalidInput {
            field: String::from("recurrence_rule"),
            message: format!("'{value}' is not one of daily, weekly, monthly"),
        },
        DomainError::InvalidStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("'{value}' is not a recognized booking status"),
        },
        DomainError::DateRangeReversed { start, end } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message: format!("end date {end} precedes start date {start}"),
        },
        DomainError::MissingRecurrenceRule => ApiError::InvalidInput {
            field: String::from("recurrence_rule"),
            message: String::from("recurring bookings must carry a recurrence rule"),
        },
        DomainError::EmptyField(field) => ApiError::InvalidInput {
            field: String::from(field),
            message: String::from("must not be empty"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::RenterExists(email) => ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("'{email}' is already registered"),
        },
        PersistenceError::RenterNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Renter"),
            message: format!("No renter with id {id}"),
        },
        PersistenceError::RequestNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Rental request"),
            message: format!("No rental request with id {id}"),
        },
        PersistenceError::EventNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Admin event"),
            message: format!("No admin event with id {id}"),
        },
        PersistenceError::InvoiceNotFound(external_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Invoice"),
            message: format!("No invoice with external id '{external_id}'"),
        },
        PersistenceError::InvoiceExists {
            renter_id,
            month,
            year,
        } => ApiError::InvalidInput {
            field: String::from("invoice"),
            message: format!("Renter {renter_id} is already invoiced for {month}/{year}"),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
