use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Time slot overlaps an existing slot: {0}")]
    Overlap(String),

    #[error("A class already occupies this cell: {0}")]
    CellOccupied(String),

    /// Raised when a replace-on-save deleted the prior timetable but the
    /// insert of its replacement failed. The key now has no persisted
    /// timetable at all, so a blind retry is not safe; the full grid must be
    /// re-submitted.
    #[error("your previous timetable was removed but the new one failed to save: {0}")]
    ReplaceWindow(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type LabResult<T> = Result<T, LabError>;
