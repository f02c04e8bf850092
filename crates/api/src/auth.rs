// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use rinkside_persistence::{Persistence, PersistenceError, RenterData, SessionData};

use crate::error::AuthError;

/// Timestamp format for session bookkeeping, UTC.
///
/// Lexicographic order on these strings matches chronological order,
/// so expiry checks in SQL compare text directly.
const SESSION_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators who review requests, manage admin events,
    /// and run billing.
    Admin,
    /// Renter role: account holders who submit and track their own
    /// rental requests.
    Renter,
}

impl Role {
    /// Returns the role's display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Renter => "Renter",
        }
    }
}

/// An authenticated renter with an associated role.
///
/// This represents an account holder whose session token has been
/// validated for the current call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedRenter {
    /// The renter's row identifier.
    pub renter_id: i64,
    /// The renter's normalized email.
    pub email: String,
    /// The role assigned to this renter.
    pub role: Role,
}

impl AuthenticatedRenter {
    /// Creates a new authenticated renter.
    #[must_use]
    pub const fn new(renter_id: i64, email: String, role: Role) -> Self {
        Self {
            renter_id,
            email,
            role,
        }
    }

    /// Returns whether this renter holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Authorization service for enforcing role-based access control.
///
/// This service determines whether an authenticated renter has
/// permission to perform a specific action based on their role.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedRenter, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Renter => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may review rental requests.
    ///
    /// Covers approval, decline, pricing, payment flags, and the
    /// all-requests listing. Only Admin actors qualify.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_review_requests(actor: &AuthenticatedRenter) -> Result<(), AuthError> {
        Self::require_admin(actor, "review_requests")
    }

    /// Checks if an actor may create, update, or delete admin events
    /// and admin-created rentals.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_schedule(actor: &AuthenticatedRenter) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_schedule")
    }

    /// Checks if an actor may generate or list monthly invoices.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_billing(actor: &AuthenticatedRenter) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_billing")
    }

    /// Checks if an actor may list or disable renter accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_renters(actor: &AuthenticatedRenter) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_renters")
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a renter by email/password and creates a session.
    ///
    /// Expired sessions are purged opportunistically on every login.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_renter`, `renter_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the account is
    /// disabled, or session bookkeeping fails.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedRenter, RenterData), AuthError> {
        let now: OffsetDateTime = OffsetDateTime::now_utc();

        if let Err(e) = persistence.delete_expired_sessions(&Self::format_timestamp(now)?) {
            // Purge failure never blocks a login.
            tracing::warn!("Failed to purge expired sessions: {e}");
        }

        let renter: RenterData = persistence
            .verify_password(email, password)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            })?;

        if renter.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let session_token: String = Self::generate_session_token();
        let expires_at: String =
            Self::format_timestamp(now + Self::DEFAULT_SESSION_EXPIRATION)?;

        persistence
            .create_session(&session_token, renter.renter_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        let actor: AuthenticatedRenter = Self::actor_for(&renter);

        Ok((session_token, actor, renter))
    }

    /// Validates a session token and returns the authenticated renter.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_renter`, `renter_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is missing or expired, or the
    /// account no longer exists or is disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedRenter, RenterData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            PrimitiveDateTime::parse(&session.expires_at, SESSION_TIMESTAMP_FORMAT)
                .map_err(|e| AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                })?
                .assume_utc();

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        if now > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let renter: RenterData = persistence
            .get_renter_by_id(session.renter_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Renter not found"),
            })?;

        if renter.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        persistence
            .update_session_activity(session.session_id, &Self::format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        let actor: AuthenticatedRenter = Self::actor_for(&renter);

        Ok((actor, renter))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    fn actor_for(renter: &RenterData) -> AuthenticatedRenter {
        let role: Role = if renter.is_admin {
            Role::Admin
        } else {
            Role::Renter
        };
        AuthenticatedRenter::new(renter.renter_id, renter.email.clone(), role)
    }

    /// Generates a session token from 128 bits of process entropy.
    fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn format_timestamp(moment: OffsetDateTime) -> Result<String, AuthError> {
        moment
            .format(SESSION_TIMESTAMP_FORMAT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format timestamp: {e}"),
            })
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
