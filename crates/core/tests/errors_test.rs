use std::error::Error;

use labwise_core::errors::{LabError, LabResult};

#[test]
fn error_display_strings() {
    let not_found = LabError::NotFound("Timetable 42".to_string());
    let validation = LabError::Validation("year 7 is outside 1-4".to_string());
    let authentication = LabError::Authentication("Invalid password".to_string());
    let authorization = LabError::Authorization("Teachers only".to_string());
    let overlap = LabError::Overlap("09:30-10:30 overlaps 09:00-10:00".to_string());
    let occupied = LabError::CellOccupied("Monday 09:00".to_string());
    let database = LabError::Database(eyre::eyre!("connection refused"));

    assert_eq!(not_found.to_string(), "Resource not found: Timetable 42");
    assert_eq!(
        validation.to_string(),
        "Validation error: year 7 is outside 1-4"
    );
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid password"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Teachers only"
    );
    assert_eq!(
        overlap.to_string(),
        "Time slot overlaps an existing slot: 09:30-10:30 overlaps 09:00-10:00"
    );
    assert_eq!(
        occupied.to_string(),
        "A class already occupies this cell: Monday 09:00"
    );
    assert!(database.to_string().contains("Database error:"));
}

#[test]
fn replace_window_error_is_loud_and_distinct() {
    let err = LabError::ReplaceWindow("insert timed out".to_string());
    let message = err.to_string();
    assert!(message.contains("previous timetable was removed"));
    assert!(message.contains("failed to save"));
    assert!(message.contains("insert timed out"));
}

#[test]
fn eyre_reports_convert_into_database_errors() {
    fn repo_call() -> eyre::Result<()> {
        Err(eyre::eyre!("unique constraint violated"))
    }
    fn layer() -> LabResult<()> {
        repo_call()?;
        Ok(())
    }
    assert!(matches!(layer(), Err(LabError::Database(_))));
}

#[test]
fn boxed_errors_convert_into_internal_errors() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
    let boxed: Box<dyn Error + Send + Sync> = Box::new(io_error);
    let err = LabError::Internal(boxed);
    assert!(err.to_string().contains("disk on fire"));
    assert!(err.source().is_some());
}
