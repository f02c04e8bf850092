// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A calendar date string could not be parsed.
    InvalidDate(String),
    /// A wall-clock time string could not be parsed.
    InvalidTime(String),
    /// A recurrence rule string is not one of `daily`, `weekly`, `monthly`.
    InvalidRecurrenceRule(String),
    /// A booking status string is not one of `pending`, `approved`, `denied`, `admin`.
    InvalidStatus(String),
    /// The booking's end date precedes its start date.
    DateRangeReversed {
        /// The start date, rendered `YYYY-MM-DD`.
        start: String,
        /// The end date, rendered `YYYY-MM-DD`.
        end: String,
    },
    /// A recurring booking was submitted without a recurrence rule.
    MissingRecurrenceRule,
    /// A required text field is empty.
    EmptyField(&'static str),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => write!(f, "Invalid date: '{value}'"),
            Self::InvalidTime(value) => write!(f, "Invalid time: '{value}'"),
            Self::InvalidRecurrenceRule(value) => {
                write!(
                    f,
                    "Invalid recurrence rule: '{value}' (expected daily, weekly, or monthly)"
                )
            }
            Self::InvalidStatus(value) => write!(f, "Invalid booking status: '{value}'"),
            Self::DateRangeReversed { start, end } => {
                write!(f, "End date {end} precedes start date {start}")
            }
            Self::MissingRecurrenceRule => {
                write!(f, "Recurring bookings must carry a recurrence rule")
            }
            Self::EmptyField(field) => write!(f, "Field '{field}' must not be empty"),
        }
    }
}

impl std::error::Error for DomainError {}
