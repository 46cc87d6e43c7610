use async_trait::async_trait;
use labwise_core::errors::{LabError, LabResult};
use labwise_core::models::{SlotRecord, Timetable, TimetableKey};
use labwise_core::store::TimetableStore;
use uuid::Uuid;

use crate::repositories::timetable as repo;
use crate::DbPool;

/// [`TimetableStore`] backed by the PostgreSQL repositories.
///
/// The trait methods follow the collaborator contract exactly; callers that
/// want the atomic variant should use
/// [`replace`](PgTimetableStore::replace) instead of driving delete and
/// create themselves.
#[derive(Clone)]
pub struct PgTimetableStore {
    pool: DbPool,
}

impl PgTimetableStore {
    pub fn new(pool: DbPool) -> Self {
        PgTimetableStore { pool }
    }

    /// Atomic replace-on-save: delete-if-present plus insert in one
    /// database transaction, closing the window where the key holds no
    /// timetable.
    pub async fn replace(
        &self,
        key: &TimetableKey,
        slots: &[SlotRecord],
    ) -> LabResult<Timetable> {
        let (timetable, assignments) = repo::replace_timetable(&self.pool, key, slots)
            .await
            .map_err(LabError::Database)?;
        timetable
            .into_timetable(&assignments)
            .map_err(LabError::Database)
    }
}

#[async_trait]
impl TimetableStore for PgTimetableStore {
    async fn find(&self, key: &TimetableKey) -> LabResult<Option<Timetable>> {
        let found = repo::find_timetable(&self.pool, key)
            .await
            .map_err(LabError::Database)?;
        match found {
            Some((timetable, assignments)) => Ok(Some(
                timetable
                    .into_timetable(&assignments)
                    .map_err(LabError::Database)?,
            )),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> LabResult<()> {
        // Deleting an already-gone row is treated as done, not an error
        repo::delete_timetable(&self.pool, id)
            .await
            .map_err(LabError::Database)?;
        Ok(())
    }

    async fn create(&self, key: &TimetableKey, slots: &[SlotRecord]) -> LabResult<Timetable> {
        let (timetable, assignments) = repo::create_timetable(&self.pool, key, slots)
            .await
            .map_err(LabError::Database)?;
        timetable
            .into_timetable(&assignments)
            .map_err(LabError::Database)
    }
}
