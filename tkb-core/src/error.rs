//! Error types for the tkb crates.

use thiserror::Error;

/// Errors that can occur while merging or exporting a timetable.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("Schedule validation failed:\n{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for tkb operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
