//! Error types for calendar operations

use std::error::Error;

use thiserror::Error;

use crate::appointment::AppointmentId;

/// Reasons an [`AppointmentInput`](crate::appointment::AppointmentInput) is refused
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is empty (or only made of whitespace)
    #[error("a title is required")]
    EmptyTitle,
    /// No date has been given
    #[error("a date is required")]
    MissingDate,
}

/// Errors that can occur when managing appointments
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid appointment: {0}")]
    Validation(#[from] ValidationError),

    #[error("Position {position} is out of bounds (there are {len} appointments)")]
    OutOfBounds { position: usize, len: usize },

    #[error("No appointment with id {0}")]
    NotFound(AppointmentId),

    #[error("Unable to deserialize appointments: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Invalid date {0:?}")]
    InvalidDate(String),

    #[error("Unable to access the persisted appointments: {0}")]
    Persistence(Box<dyn Error>),
}

/// Result type alias for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;
