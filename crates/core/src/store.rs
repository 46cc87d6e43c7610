use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::LabResult;
use crate::models::timetable::{SlotRecord, Timetable, TimetableKey};

/// Persistence collaborator for timetables.
///
/// The engine drives this contract as find, then delete (when a prior
/// timetable exists), then create. Implementations that can do better --
/// e.g. a single database transaction -- are free to expose a combined
/// replace operation alongside this trait; see `labwise-db`.
#[async_trait]
pub trait TimetableStore: Send + Sync {
    /// Returns the single active timetable for `key`, with its assignments.
    async fn find(&self, key: &TimetableKey) -> LabResult<Option<Timetable>>;

    /// Deletes a timetable and, cascading, its assignments.
    async fn delete(&self, id: Uuid) -> LabResult<()>;

    /// Inserts a new timetable for `key` owning `slots`. The store mints
    /// persisted identifiers.
    async fn create(&self, key: &TimetableKey, slots: &[SlotRecord]) -> LabResult<Timetable>;
}
