use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::errors::{LabError, LabResult};
use crate::models::slot::{SlotTime, Weekday};

/// The tuple identifying at most one active timetable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableKey {
    pub department: String,
    pub year: u8,
    pub academic_year: String,
    pub section: String,
}

impl TimetableKey {
    pub fn validate(&self) -> LabResult<()> {
        if !catalog::is_department(&self.department) {
            return Err(LabError::Validation(format!(
                "unknown department '{}'",
                self.department
            )));
        }
        if !catalog::is_year(self.year) {
            return Err(LabError::Validation(format!(
                "year {} is outside 1-4",
                self.year
            )));
        }
        if !catalog::is_academic_year(&self.academic_year) {
            return Err(LabError::Validation(format!(
                "unknown academic year '{}'",
                self.academic_year
            )));
        }
        if !catalog::is_section(&self.section) {
            return Err(LabError::Validation(format!(
                "unknown section '{}'",
                self.section
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for TimetableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.department, self.year, self.academic_year, self.section
        )
    }
}

/// One persisted class assignment, stripped of transient session identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub day: Weekday,
    #[serde(rename = "startTime")]
    pub start: SlotTime,
    #[serde(rename = "endTime")]
    pub end: SlotTime,
    pub subject: String,
    pub subject_code: String,
    pub professor: String,
}

/// The persisted aggregate: one weekly grid for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub id: Uuid,
    #[serde(flatten)]
    pub key: TimetableKey,
    pub slots: Vec<SlotRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of the save endpoint: the full grid for one key. Saving is a
/// replace, never a merge; slots omitted here are dropped from persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTimetableRequest {
    #[serde(flatten)]
    pub key: TimetableKey,
    pub slots: Vec<SlotRecord>,
}
