// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rinkside_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A renter with the given email already exists.
    RenterExists(String),
    /// The requested renter was not found.
    RenterNotFound(i64),
    /// The requested rental request was not found.
    RequestNotFound(i64),
    /// The requested admin event was not found.
    EventNotFound(i64),
    /// An invoice already exists for the renter and billing month.
    InvoiceExists {
        /// The renter being invoiced.
        renter_id: i64,
        /// Billing month, 1-12.
        month: i32,
        /// Billing year.
        year: i32,
    },
    /// The requested invoice was not found.
    InvoiceNotFound(String),
    /// A stored row could not be mapped back to a domain value.
    InvalidRow(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::RenterExists(email) => {
                write!(f, "A renter with email '{email}' already exists")
            }
            Self::RenterNotFound(id) => write!(f, "Renter not found: {id}"),
            Self::RequestNotFound(id) => write!(f, "Rental request not found: {id}"),
            Self::EventNotFound(id) => write!(f, "Admin event not found: {id}"),
            Self::InvoiceExists {
                renter_id,
                month,
                year,
            } => {
                write!(
                    f,
                    "Invoice already exists for renter {renter_id}, {month}/{year}"
                )
            }
            Self::InvoiceNotFound(msg) => write!(f, "Invoice not found: {msg}"),
            Self::InvalidRow(msg) => write!(f, "Invalid stored row: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::InvalidRow(err.to_string())
    }
}
