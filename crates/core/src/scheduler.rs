//! The grid editing session: time slot rows, class assignments, and the
//! conflict rules between them.
//!
//! A [`GridSession`] holds the in-memory state of one teacher composing one
//! timetable. Every mutating operation validates before it applies and
//! leaves the session untouched on failure; nothing here talks to storage
//! except [`GridSession::save`], which drives the [`TimetableStore`]
//! collaborator.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::errors::{LabError, LabResult};
use crate::models::slot::{
    ClassAssignment, SlotKind, SlotTemplate, SlotTime, TimeSlotDefinition, Weekday,
};
use crate::models::timetable::{SlotRecord, Timetable, TimetableKey};
use crate::store::TimetableStore;

/// Strict half-open overlap test on `[start, end)` intervals.
///
/// Intervals that merely touch at an endpoint do not overlap. This is the
/// sole conflict primitive; every slot edit reduces to evaluating it.
pub fn overlaps(a: (SlotTime, SlotTime), b: (SlotTime, SlotTime)) -> bool {
    a.0 < b.1 && a.1 > b.0
}

/// A single-field edit to a time slot definition.
#[derive(Debug, Clone)]
pub enum SlotEdit {
    Start(SlotTime),
    End(SlotTime),
    Kind(SlotKind),
    Label(String),
}

fn default_first_slot() -> (SlotTime, SlotTime) {
    // 09:00 - 10:00, both in range by construction
    (SlotTime::new(9 * 60).unwrap(), SlotTime::new(10 * 60).unwrap())
}

/// In-memory state for one timetable composition session.
#[derive(Debug, Clone)]
pub struct GridSession {
    key: TimetableKey,
    /// Persisted timetable this session supersedes on save, if any
    existing_id: Option<Uuid>,
    definitions: Vec<TimeSlotDefinition>,
    assignments: Vec<ClassAssignment>,
}

impl GridSession {
    /// Starts a blank session, seeded with the default 09:00-10:00 class row.
    pub fn new(key: TimetableKey) -> LabResult<Self> {
        key.validate()?;
        let (start, end) = default_first_slot();
        Ok(GridSession {
            key,
            existing_id: None,
            definitions: vec![TimeSlotDefinition::class(start, end)],
            assignments: Vec::new(),
        })
    }

    /// Rebuilds a session from persisted assignments.
    ///
    /// Row headers are not stored independently, so the definitions are
    /// derived: the distinct (start, end) pairs among the assignments, each
    /// treated as a class row, ordered by start time. Assignments get fresh
    /// transient identifiers.
    pub fn load_existing(key: TimetableKey, timetable: &Timetable) -> LabResult<Self> {
        let mut session = Self::from_records(key, &timetable.slots)?;
        session.existing_id = Some(timetable.id);
        Ok(session)
    }

    /// Builds a session from a flat list of slot records, deriving row
    /// definitions and checking every grid invariant: valid key, positive
    /// slot durations, non-overlapping derived rows, no double-booked cell.
    pub fn from_records(key: TimetableKey, records: &[SlotRecord]) -> LabResult<Self> {
        key.validate()?;

        for record in records {
            if record.start >= record.end {
                return Err(LabError::Validation(format!(
                    "slot {}-{} has no duration",
                    record.start, record.end
                )));
            }
        }

        // BTreeSet orders by start then end, which is the row order the
        // grid renders
        let intervals: BTreeSet<(SlotTime, SlotTime)> =
            records.iter().map(|r| (r.start, r.end)).collect();

        let intervals: Vec<(SlotTime, SlotTime)> = intervals.into_iter().collect();
        for (i, a) in intervals.iter().enumerate() {
            for b in &intervals[i + 1..] {
                if overlaps(*a, *b) {
                    return Err(LabError::Overlap(format!(
                        "{}-{} overlaps {}-{}",
                        a.0, a.1, b.0, b.1
                    )));
                }
            }
        }

        let definitions = intervals
            .into_iter()
            .map(|(start, end)| TimeSlotDefinition::class(start, end))
            .collect();

        let mut assignments: Vec<ClassAssignment> = Vec::with_capacity(records.len());
        for record in records {
            if assignments
                .iter()
                .any(|a| a.day == record.day && a.start == record.start)
            {
                return Err(LabError::CellOccupied(format!(
                    "{} {}",
                    record.day, record.start
                )));
            }
            assignments.push(ClassAssignment {
                id: Uuid::new_v4(),
                day: record.day,
                start: record.start,
                end: record.end,
                subject: record.subject.clone(),
                subject_code: record.subject_code.clone(),
                professor: record.professor.clone(),
            });
        }

        Ok(GridSession {
            key,
            existing_id: None,
            definitions,
            assignments,
        })
    }

    pub fn key(&self) -> &TimetableKey {
        &self.key
    }

    pub fn existing_id(&self) -> Option<Uuid> {
        self.existing_id
    }

    pub fn definitions(&self) -> &[TimeSlotDefinition] {
        &self.definitions
    }

    pub fn assignments(&self) -> &[ClassAssignment] {
        &self.assignments
    }

    /// Appends a time slot definition.
    ///
    /// When no interval is proposed, the new row starts where the last one
    /// ends (09:00 on an empty list) and runs for an hour. Fails with
    /// [`LabError::Overlap`] if the candidate clashes with any existing
    /// definition; the list is unchanged on failure.
    pub fn add_time_slot(
        &mut self,
        proposed: Option<(SlotTime, SlotTime)>,
    ) -> LabResult<&TimeSlotDefinition> {
        let (start, end) = match proposed {
            Some(interval) => interval,
            None => {
                let start = self
                    .definitions
                    .last()
                    .map(|d| d.end)
                    .unwrap_or_else(|| default_first_slot().0);
                let end = start.plus_minutes(60).ok_or_else(|| {
                    LabError::Validation(format!("a slot starting at {} cannot run an hour", start))
                })?;
                (start, end)
            }
        };

        if start >= end {
            return Err(LabError::Validation(format!(
                "slot {}-{} has no duration",
                start, end
            )));
        }

        if let Some(existing) = self
            .definitions
            .iter()
            .find(|d| overlaps(d.interval(), (start, end)))
        {
            return Err(LabError::Overlap(format!(
                "{}-{} overlaps {}-{}",
                start, end, existing.start, existing.end
            )));
        }

        self.definitions
            .push(TimeSlotDefinition::class(start, end));
        Ok(self.definitions.last().expect("just pushed"))
    }

    /// Applies a single-field edit to one definition.
    ///
    /// Time edits are re-validated against every other definition and the
    /// whole update is rejected on any overlap; kind and label edits cannot
    /// create temporal conflicts and apply unconditionally.
    pub fn update_time_slot(&mut self, id: Uuid, edit: SlotEdit) -> LabResult<()> {
        let index = self
            .definitions
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| LabError::NotFound(format!("time slot {}", id)))?;

        let candidate = match edit {
            SlotEdit::Kind(kind) => {
                self.definitions[index].kind = kind;
                return Ok(());
            }
            SlotEdit::Label(label) => {
                self.definitions[index].label = Some(label);
                return Ok(());
            }
            SlotEdit::Start(start) => (start, self.definitions[index].end),
            SlotEdit::End(end) => (self.definitions[index].start, end),
        };

        if candidate.0 >= candidate.1 {
            return Err(LabError::Validation(format!(
                "slot {}-{} has no duration",
                candidate.0, candidate.1
            )));
        }

        if let Some(other) = self
            .definitions
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, d)| d)
            .find(|d| overlaps(d.interval(), candidate))
        {
            return Err(LabError::Overlap(format!(
                "{}-{} overlaps {}-{}",
                candidate.0, candidate.1, other.start, other.end
            )));
        }

        let definition = &mut self.definitions[index];
        definition.start = candidate.0;
        definition.end = candidate.1;
        Ok(())
    }

    /// Removes one definition. Returns whether anything was removed;
    /// assignments in those minutes are left alone, as the grid renders them
    /// rowless until the caller cleans up.
    pub fn remove_time_slot(&mut self, id: Uuid) -> bool {
        let before = self.definitions.len();
        self.definitions.retain(|d| d.id != id);
        self.definitions.len() != before
    }

    /// Drops a dragged template onto the cell (day, definition).
    ///
    /// The target row must be class-bearing and the cell must be empty; on
    /// success the new assignment copies the template's descriptive fields
    /// and the row's interval.
    pub fn assign(
        &mut self,
        day: Weekday,
        definition_id: Uuid,
        template: &SlotTemplate,
    ) -> LabResult<&ClassAssignment> {
        let definition = self
            .definitions
            .iter()
            .find(|d| d.id == definition_id)
            .ok_or_else(|| LabError::NotFound(format!("time slot {}", definition_id)))?;

        if definition.kind != SlotKind::Class {
            return Err(LabError::Validation(format!(
                "cannot assign a class to the {}-{} break slot",
                definition.start, definition.end
            )));
        }

        if self
            .assignments
            .iter()
            .any(|a| a.day == day && a.start == definition.start)
        {
            return Err(LabError::CellOccupied(format!("{} {}", day, definition.start)));
        }

        self.assignments.push(ClassAssignment {
            id: Uuid::new_v4(),
            day,
            start: definition.start,
            end: definition.end,
            subject: template.subject.clone(),
            subject_code: template.subject_code.clone(),
            professor: template.professor.clone(),
        });
        Ok(self.assignments.last().expect("just pushed"))
    }

    /// Removes one assignment by its transient id. Returns `false` when
    /// already absent, which callers treat as success.
    pub fn unassign(&mut self, assignment_id: Uuid) -> bool {
        let before = self.assignments.len();
        self.assignments.retain(|a| a.id != assignment_id);
        self.assignments.len() != before
    }

    /// Empties every cell, keeping the row definitions. Confirmation is the
    /// boundary's concern.
    pub fn clear_assignments(&mut self) {
        self.assignments.clear();
    }

    /// Flattens the grid into persistable records, transient ids stripped.
    pub fn to_slot_records(&self) -> Vec<SlotRecord> {
        self.assignments
            .iter()
            .map(|a| SlotRecord {
                day: a.day,
                start: a.start,
                end: a.end,
                subject: a.subject.clone(),
                subject_code: a.subject_code.clone(),
                professor: a.professor.clone(),
            })
            .collect()
    }

    /// Re-checks every grid invariant. Sessions maintain these invariants
    /// operation by operation, but save refuses to touch persistence on a
    /// grid that somehow lost them.
    pub fn validate(&self) -> LabResult<()> {
        self.key.validate()?;
        for (i, a) in self.definitions.iter().enumerate() {
            for b in &self.definitions[i + 1..] {
                if overlaps(a.interval(), b.interval()) {
                    return Err(LabError::Overlap(format!(
                        "{}-{} overlaps {}-{}",
                        a.start, a.end, b.start, b.end
                    )));
                }
            }
        }
        for (i, a) in self.assignments.iter().enumerate() {
            for b in &self.assignments[i + 1..] {
                if a.day == b.day && a.start == b.start {
                    return Err(LabError::CellOccupied(format!("{} {}", a.day, a.start)));
                }
            }
        }
        Ok(())
    }

    /// Persists the grid with replace semantics: find the active timetable
    /// for the key, delete it when present, then insert the new aggregate.
    ///
    /// A create failure after a successful delete leaves the key with no
    /// timetable at all and surfaces as the distinct
    /// [`LabError::ReplaceWindow`], because a plain retry is not safe.
    /// Validation always runs before any persistence call.
    pub async fn save(&mut self, store: &dyn TimetableStore) -> LabResult<Timetable> {
        self.validate()?;
        let records = self.to_slot_records();

        let existing = store.find(&self.key).await?;
        let replacing = existing.is_some();
        if let Some(previous) = existing {
            store.delete(previous.id).await?;
        }

        let created = match store.create(&self.key, &records).await {
            Ok(timetable) => timetable,
            Err(err) if replacing => return Err(LabError::ReplaceWindow(err.to_string())),
            Err(err) => return Err(err),
        };

        self.existing_id = Some(created.id);
        Ok(created)
    }
}
