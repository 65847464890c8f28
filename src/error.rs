//! Error types for the Overtime Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating and storing
//! overtime.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the Overtime Engine.
///
/// Every failure is scoped to the single operation that triggered it;
/// nothing here is fatal to the process.
///
/// # Example
///
/// ```
/// use overtime_engine::error::EngineError;
///
/// let error = EngineError::InvalidTime {
///     value: "25:99".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid clock time '25:99': expected HH:MM");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A clock time could not be parsed.
    #[error("Invalid clock time '{value}': expected HH:MM")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// The submitted window yields no payable hours.
    #[error("Invalid hours for {date}: computed {hours} hours")]
    InvalidHours {
        /// The overtime date.
        date: NaiveDate,
        /// The computed payable hours.
        hours: Decimal,
    },

    /// An input value was outside its valid range.
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        message: String,
    },

    /// The referenced employee does not exist.
    #[error("Employee not found: {user_id}")]
    EmployeeNotFound {
        /// The unknown employee id.
        user_id: String,
    },

    /// The actor may not perform the operation.
    #[error("Employee '{actor_id}' is not allowed to {action}")]
    Forbidden {
        /// The acting employee.
        actor_id: String,
        /// The attempted action.
        action: String,
    },

    /// An overtime record already exists for the user and date.
    #[error("Overtime already recorded for '{user_id}' on {date}")]
    DuplicateOvertime {
        /// The owning user.
        user_id: String,
        /// The overtime date.
        date: NaiveDate,
    },

    /// No overtime record exists with the given id.
    #[error("Overtime record not found: {id}")]
    OvertimeNotFound {
        /// The missing record id.
        id: Uuid,
    },

    /// Another submission for the same user and date has not finished yet.
    #[error("A submission for '{user_id}' on {date} is already in progress")]
    SubmissionInProgress {
        /// The owning user.
        user_id: String,
        /// The overtime date.
        date: NaiveDate,
    },

    /// The storage backend failed.
    #[error("Storage error: {message}")]
    Storage {
        /// The raw failure text from the backend.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Returns true for errors caused by the caller's input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidTime { .. }
                | EngineError::InvalidHours { .. }
                | EngineError::InvalidInput { .. }
        )
    }
}
