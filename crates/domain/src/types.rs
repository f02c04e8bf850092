// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, Time};

/// Supported recurrence patterns for a booking.
///
/// These are the only three patterns the scheduler understands. They are
/// deliberately simpler than a general calendar recurrence grammar: no
/// intervals, counts, or exception dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// One occurrence every calendar day.
    Daily,
    /// One occurrence per week, on the weekday of the booking's start date.
    Weekly,
    /// One occurrence per month, on the start date's day-of-month,
    /// clamped to the last day of shorter months.
    Monthly,
}

impl FromStr for RecurrenceRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(DomainError::InvalidRecurrenceRule(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RecurrenceRule {
    /// Converts this rule to its lowercase string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Lifecycle status of a rental request.
///
/// Admin events carry no status at all; they are implicitly pre-approved
/// and always participate in conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Submitted by a renter, awaiting review.
    Pending,
    /// Approved (and priced) by an admin.
    Approved,
    /// Declined by an admin.
    Denied,
    /// Created by an admin on a renter's behalf; active immediately.
    Admin,
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl BookingStatus {
    /// Converts this status to its lowercase string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Admin => "admin",
        }
    }

    /// Returns whether a rental with this status participates in conflict
    /// detection. Only approved and admin-priced rentals do; pending and
    /// denied rentals never block new submissions.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Approved | Self::Admin)
    }
}

/// Which table a booking row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingKind {
    /// A renter-facing rental request.
    Rental,
    /// An admin-created rink event (maintenance, public skate, etc.).
    AdminEvent,
}

const TIME_HMS: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const TIME_HM: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]");
const TIME_12H: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

/// A wall-clock time of day, paired with the display text it arrived as.
///
/// Storage and HTTP callers hand us clock times in several shapes:
/// `HH:MM:SS` from the database, `HH:MM` from forms, and `H:MM AM/PM`
/// from the admin UI. Comparisons always use the parsed value; rendering
/// always echoes the original text, because the core never reformats
/// clock time.
#[derive(Debug, Clone)]
pub struct TimeOfDay {
    /// The parsed wall-clock value, used for ordering and overlap tests.
    value: Time,
    /// The display text exactly as supplied by the caller.
    display: String,
}

// Equality and ordering ignore the display text: "2:00 PM" and "14:00:00"
// are the same instant.
impl PartialEq for TimeOfDay {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for TimeOfDay {}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl std::hash::Hash for TimeOfDay {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl FromStr for TimeOfDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TimeOfDay {
    /// Parses a clock time from any of the accepted display formats.
    ///
    /// Accepted formats, tried in order: `HH:MM:SS`, `HH:MM`,
    /// `H:MM AM`/`H:MM PM`. The original text is retained for display.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTime` if the string matches none of
    /// the accepted formats.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed: &str = s.trim();
        let value: Time = Time::parse(trimmed, TIME_HMS)
            .or_else(|_| Time::parse(trimmed, TIME_HM))
            .or_else(|_| Time::parse(&trimmed.to_uppercase(), TIME_12H))
            .map_err(|_| DomainError::InvalidTime(s.to_string()))?;
        Ok(Self {
            value,
            display: trimmed.to_string(),
        })
    }

    /// Constructs a `TimeOfDay` from an already-parsed value, rendering
    /// the display text as `HH:MM:SS`.
    #[must_use]
    pub fn from_time(value: Time) -> Self {
        let display: String = format!(
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        Self { value, display }
    }

    /// Returns the parsed wall-clock value.
    #[must_use]
    pub const fn value(&self) -> Time {
        self.value
    }

    /// Returns the display text exactly as supplied.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }
}

const DATE_ISO: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
const DATE_US: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[month]/[day]/[year]");

/// Parses a calendar date from `YYYY-MM-DD` or `MM/DD/YYYY`.
///
/// The database stores ISO dates; the booking-form path historically
/// submits US-style dates. Both are accepted at the boundary.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the string matches neither
/// format.
pub fn parse_date(s: &str) -> Result<Date, DomainError> {
    let trimmed: &str = s.trim();
    Date::parse(trimmed, DATE_ISO)
        .or_else(|_| Date::parse(trimmed, DATE_US))
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

/// Renders a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// A stored booking: either a rental request or an admin event.
///
/// Bookings are owned by the persistence layer. The core never mutates
/// them; it only reads them and projects them into [`Occurrence`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Row identifier, unique within the booking's kind.
    pub id: i64,
    /// Which table this booking came from.
    pub kind: BookingKind,
    /// Display name of the rental or event.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// First calendar day (inclusive). For non-recurring bookings this is
    /// the only day an occurrence lands on.
    pub start_date: Date,
    /// Last calendar day (inclusive). For recurring bookings this is the
    /// recurrence horizon.
    pub end_date: Date,
    /// Wall-clock start applied to every occurrence.
    pub start_time: TimeOfDay,
    /// Wall-clock end applied to every occurrence.
    pub end_time: TimeOfDay,
    /// Rental lifecycle status. `None` for admin events, which carry no
    /// status and are treated as always-active.
    pub status: Option<BookingStatus>,
    /// Whether this booking repeats.
    pub is_recurring: bool,
    /// The recurrence pattern. Expected to be `Some` when `is_recurring`
    /// is true; a recurring booking with `None` here expands to nothing.
    pub recurrence_rule: Option<RecurrenceRule>,
}

impl Booking {
    /// Returns whether this booking participates in conflict detection.
    ///
    /// Admin events always do. Rentals do only while approved or
    /// admin-priced.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.kind {
            BookingKind::AdminEvent => true,
            BookingKind::Rental => self.status.is_some_and(|s| s.is_active()),
        }
    }

    /// The status string surfaced to the calendar UI.
    ///
    /// Admin events render as `admin` regardless of their (absent) status
    /// column, matching the `'admin' as status` projection the original
    /// calendar query performed.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        match self.kind {
            BookingKind::AdminEvent => "admin",
            BookingKind::Rental => self
                .status
                .map_or(BookingStatus::Pending.as_str(), |s| s.as_str()),
        }
    }
}

/// A booking being proposed for insertion: same shape as [`Booking`]
/// minus identity and status, which do not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedBooking {
    /// Display name of the rental or event.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// First calendar day (inclusive).
    pub start_date: Date,
    /// Last calendar day (inclusive); recurrence horizon when recurring.
    pub end_date: Date,
    /// Wall-clock start.
    pub start_time: TimeOfDay,
    /// Wall-clock end.
    pub end_time: TimeOfDay,
    /// Whether this booking repeats.
    pub is_recurring: bool,
    /// The recurrence pattern, when recurring.
    pub recurrence_rule: Option<RecurrenceRule>,
}

/// One concrete dated instance of a booking, produced for display.
///
/// Occurrences are derived on demand for a query window and discarded
/// after serialization; they have no identity beyond `(id, date)` and are
/// never persisted. Field names serialize to the calendar UI's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// The source booking's identifier.
    #[serde(rename = "id")]
    pub source_id: i64,
    /// The source booking's title.
    #[serde(rename = "name")]
    pub title: String,
    /// The source booking's description.
    pub description: String,
    /// Display time range, `"<start_time> - <end_time>"`, in whatever
    /// clock format the source row carried.
    pub time: String,
    /// The occurrence date, rendered `YYYY-MM-DD`.
    pub date: String,
    /// The source booking's status label (`admin` for admin events).
    pub status: String,
    /// Whether the source booking is recurring.
    #[serde(rename = "isRecurring")]
    pub is_recurring: bool,
    /// The source booking's recurrence rule, if any.
    #[serde(rename = "recurrenceRule")]
    pub recurrence_rule: Option<RecurrenceRule>,
}
