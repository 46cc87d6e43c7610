use chrono::{DateTime, Utc};
use eyre::Result;
use labwise_core::models::{SlotRecord, Timetable, TimetableKey, User};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl DbUser {
    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role.parse().map_err(|e| eyre::eyre!("{}", e))?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetable {
    pub id: Uuid,
    pub department: String,
    pub year: i32,
    pub academic_year: String,
    pub section: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlotAssignment {
    pub id: Uuid,
    pub timetable_id: Uuid,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub subject_code: String,
    pub professor: String,
}

impl DbSlotAssignment {
    pub fn to_record(&self) -> Result<SlotRecord> {
        Ok(SlotRecord {
            day: self.day.parse().map_err(|e| eyre::eyre!("{}", e))?,
            start: self.start_time.parse().map_err(|e| eyre::eyre!("{}", e))?,
            end: self.end_time.parse().map_err(|e| eyre::eyre!("{}", e))?,
            subject: self.subject.clone(),
            subject_code: self.subject_code.clone(),
            professor: self.professor.clone(),
        })
    }
}

impl DbTimetable {
    pub fn into_timetable(self, assignments: &[DbSlotAssignment]) -> Result<Timetable> {
        let slots = assignments
            .iter()
            .map(DbSlotAssignment::to_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Timetable {
            id: self.id,
            key: TimetableKey {
                department: self.department,
                year: u8::try_from(self.year)
                    .map_err(|_| eyre::eyre!("stored year {} is out of range", self.year))?,
                academic_year: self.academic_year,
                section: self.section,
            },
            slots,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
