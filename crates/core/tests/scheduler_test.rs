use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use labwise_core::errors::{LabError, LabResult};
use labwise_core::models::{
    SlotKind, SlotRecord, SlotTemplate, SlotTime, Timetable, TimetableKey, Weekday,
};
use labwise_core::scheduler::{overlaps, GridSession, SlotEdit};
use labwise_core::store::TimetableStore;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

fn t(hhmm: &str) -> SlotTime {
    hhmm.parse().expect("valid test time")
}

fn test_key() -> TimetableKey {
    TimetableKey {
        department: "CSE-DS".to_string(),
        year: 2,
        academic_year: "2024-25".to_string(),
        section: "A".to_string(),
    }
}

fn template(subject: &str) -> SlotTemplate {
    SlotTemplate {
        subject: subject.to_string(),
        subject_code: "CS201".to_string(),
        professor: "Dr. X".to_string(),
    }
}

fn record(day: Weekday, start: &str, end: &str, subject: &str) -> SlotRecord {
    SlotRecord {
        day,
        start: t(start),
        end: t(end),
        subject: subject.to_string(),
        subject_code: "CS201".to_string(),
        professor: "Dr. X".to_string(),
    }
}

#[rstest]
#[case("09:00", "10:00", "10:00", "11:00", false)] // touching endpoints
#[case("09:00", "11:00", "09:30", "10:30", true)] // strict containment
#[case("09:00", "10:00", "09:30", "10:30", true)] // partial overlap
#[case("09:00", "10:00", "11:00", "12:00", false)] // disjoint
#[case("09:00", "10:00", "09:00", "10:00", true)] // identical
fn overlap_cases(
    #[case] a_start: &str,
    #[case] a_end: &str,
    #[case] b_start: &str,
    #[case] b_end: &str,
    #[case] expected: bool,
) {
    let a = (t(a_start), t(a_end));
    let b = (t(b_start), t(b_end));
    assert_eq!(overlaps(a, b), expected);
    // symmetry
    assert_eq!(overlaps(b, a), expected);
}

#[test]
fn positive_duration_interval_overlaps_itself() {
    let a = (t("13:15"), t("14:05"));
    assert!(overlaps(a, a));
}

#[test]
fn new_session_seeds_default_row() {
    let session = GridSession::new(test_key()).unwrap();
    assert_eq!(session.definitions().len(), 1);
    assert_eq!(session.definitions()[0].start, t("09:00"));
    assert_eq!(session.definitions()[0].end, t("10:00"));
    assert_eq!(session.definitions()[0].kind, SlotKind::Class);
    assert!(session.assignments().is_empty());
}

#[test]
fn new_session_rejects_unknown_department() {
    let key = TimetableKey {
        department: "BASKETWEAVING".to_string(),
        ..test_key()
    };
    assert!(matches!(
        GridSession::new(key),
        Err(LabError::Validation(_))
    ));
}

#[test]
fn add_time_slot_on_empty_list_defaults_to_nine_to_ten() {
    let mut session = GridSession::new(test_key()).unwrap();
    let seeded = session.definitions()[0].id;
    assert!(session.remove_time_slot(seeded));
    assert!(session.definitions().is_empty());

    let added = session.add_time_slot(None).unwrap();
    assert_eq!(added.start, t("09:00"));
    assert_eq!(added.end, t("10:00"));
}

#[test]
fn add_time_slot_defaults_continue_from_last_row() {
    let mut session = GridSession::new(test_key()).unwrap();
    let added = session.add_time_slot(None).unwrap();
    assert_eq!(added.start, t("10:00"));
    assert_eq!(added.end, t("11:00"));
}

#[test]
fn add_time_slot_rejects_overlap_and_leaves_list_unchanged() {
    let mut session = GridSession::new(test_key()).unwrap();
    let err = session
        .add_time_slot(Some((t("09:30"), t("10:30"))))
        .unwrap_err();
    assert!(matches!(err, LabError::Overlap(_)));
    assert_eq!(session.definitions().len(), 1);
    assert_eq!(session.definitions()[0].start, t("09:00"));
}

#[test]
fn update_time_slot_rejects_overlapping_edit() {
    let mut session = GridSession::new(test_key()).unwrap();
    session.add_time_slot(Some((t("10:00"), t("11:00")))).unwrap();
    let second = session.definitions()[1].id;

    let err = session
        .update_time_slot(second, SlotEdit::Start(t("09:30")))
        .unwrap_err();
    assert!(matches!(err, LabError::Overlap(_)));
    // all-or-nothing: second row untouched
    assert_eq!(session.definitions()[1].start, t("10:00"));
}

#[test]
fn update_time_slot_applies_non_conflicting_times() {
    let mut session = GridSession::new(test_key()).unwrap();
    let id = session.definitions()[0].id;
    session
        .update_time_slot(id, SlotEdit::End(t("10:30")))
        .unwrap();
    assert_eq!(session.definitions()[0].end, t("10:30"));
}

#[test]
fn update_time_slot_kind_and_label_apply_unconditionally() {
    let mut session = GridSession::new(test_key()).unwrap();
    let id = session.definitions()[0].id;
    session
        .update_time_slot(id, SlotEdit::Kind(SlotKind::Break))
        .unwrap();
    session
        .update_time_slot(id, SlotEdit::Label("Lunch".to_string()))
        .unwrap();
    assert_eq!(session.definitions()[0].kind, SlotKind::Break);
    assert_eq!(session.definitions()[0].label.as_deref(), Some("Lunch"));
}

#[test]
fn update_time_slot_unknown_id_is_not_found() {
    let mut session = GridSession::new(test_key()).unwrap();
    let err = session
        .update_time_slot(Uuid::new_v4(), SlotEdit::End(t("11:00")))
        .unwrap_err();
    assert!(matches!(err, LabError::NotFound(_)));
}

#[test]
fn assign_into_occupied_cell_fails_and_grid_is_unchanged() {
    let mut session = GridSession::new(test_key()).unwrap();
    let row = session.definitions()[0].id;
    session
        .assign(Weekday::Monday, row, &template("AI/ML"))
        .unwrap();

    let err = session
        .assign(Weekday::Monday, row, &template("Data Science"))
        .unwrap_err();
    assert!(matches!(err, LabError::CellOccupied(_)));
    assert_eq!(session.assignments().len(), 1);
    assert_eq!(session.assignments()[0].subject, "AI/ML");
}

#[test]
fn assign_same_row_different_day_is_allowed() {
    let mut session = GridSession::new(test_key()).unwrap();
    let row = session.definitions()[0].id;
    session
        .assign(Weekday::Monday, row, &template("AI/ML"))
        .unwrap();
    session
        .assign(Weekday::Tuesday, row, &template("AI/ML"))
        .unwrap();
    assert_eq!(session.assignments().len(), 2);
}

#[test]
fn assign_onto_break_row_is_rejected() {
    let mut session = GridSession::new(test_key()).unwrap();
    let row = session.definitions()[0].id;
    session
        .update_time_slot(row, SlotEdit::Kind(SlotKind::Break))
        .unwrap();
    let err = session
        .assign(Weekday::Monday, row, &template("AI/ML"))
        .unwrap_err();
    assert!(matches!(err, LabError::Validation(_)));
    assert!(session.assignments().is_empty());
}

#[test]
fn assign_then_unassign_round_trips() {
    let mut session = GridSession::new(test_key()).unwrap();
    let row = session.definitions()[0].id;
    let before = session.assignments().to_vec();

    let id = session
        .assign(Weekday::Wednesday, row, &template("AI/ML"))
        .unwrap()
        .id;
    assert_eq!(session.assignments().len(), 1);

    assert!(session.unassign(id));
    assert_eq!(session.assignments(), before.as_slice());

    // already absent: not fatal
    assert!(!session.unassign(id));
}

#[test]
fn clear_assignments_keeps_definitions() {
    let mut session = GridSession::new(test_key()).unwrap();
    let row = session.definitions()[0].id;
    session
        .assign(Weekday::Monday, row, &template("AI/ML"))
        .unwrap();
    session.clear_assignments();
    assert!(session.assignments().is_empty());
    assert_eq!(session.definitions().len(), 1);
}

#[test]
fn load_existing_derives_sorted_distinct_rows() {
    let timetable = Timetable {
        id: Uuid::new_v4(),
        key: test_key(),
        slots: vec![
            record(Weekday::Monday, "09:00", "10:00", "AI/ML"),
            record(Weekday::Tuesday, "09:00", "10:00", "AI/ML"),
            record(Weekday::Monday, "10:00", "11:00", "Data Science"),
        ],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let session = GridSession::load_existing(test_key(), &timetable).unwrap();
    assert_eq!(session.existing_id(), Some(timetable.id));
    assert_eq!(session.definitions().len(), 2);
    assert_eq!(session.definitions()[0].start, t("09:00"));
    assert_eq!(session.definitions()[1].start, t("10:00"));
    assert_eq!(session.assignments().len(), 3);
}

#[test]
fn from_records_rejects_double_booked_cell() {
    let records = vec![
        record(Weekday::Monday, "09:00", "10:00", "AI/ML"),
        record(Weekday::Monday, "09:00", "10:00", "Data Science"),
    ];
    let err = GridSession::from_records(test_key(), &records).unwrap_err();
    assert!(matches!(err, LabError::CellOccupied(_)));
}

#[test]
fn from_records_rejects_overlapping_derived_rows() {
    let records = vec![
        record(Weekday::Monday, "09:00", "10:30", "AI/ML"),
        record(Weekday::Tuesday, "10:00", "11:00", "Data Science"),
    ];
    let err = GridSession::from_records(test_key(), &records).unwrap_err();
    assert!(matches!(err, LabError::Overlap(_)));
}

/// Records the order of store calls and optionally fails the create step.
struct RecordingStore {
    calls: Mutex<Vec<String>>,
    existing: Option<Timetable>,
    fail_create: bool,
}

impl RecordingStore {
    fn new(existing: Option<Timetable>) -> Self {
        RecordingStore {
            calls: Mutex::new(Vec::new()),
            existing,
            fail_create: false,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TimetableStore for RecordingStore {
    async fn find(&self, _key: &TimetableKey) -> LabResult<Option<Timetable>> {
        self.calls.lock().unwrap().push("find".to_string());
        Ok(self.existing.clone())
    }

    async fn delete(&self, _id: Uuid) -> LabResult<()> {
        self.calls.lock().unwrap().push("delete".to_string());
        Ok(())
    }

    async fn create(&self, key: &TimetableKey, slots: &[SlotRecord]) -> LabResult<Timetable> {
        self.calls.lock().unwrap().push("create".to_string());
        if self.fail_create {
            return Err(LabError::Database(eyre::eyre!("connection reset")));
        }
        Ok(Timetable {
            id: Uuid::new_v4(),
            key: key.clone(),
            slots: slots.to_vec(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

fn persisted(slots: Vec<SlotRecord>) -> Timetable {
    Timetable {
        id: Uuid::new_v4(),
        key: test_key(),
        slots,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn save_without_prior_timetable_creates_only() {
    let store = RecordingStore::new(None);
    let mut session = GridSession::new(test_key()).unwrap();
    let row = session.definitions()[0].id;
    session
        .assign(Weekday::Monday, row, &template("AI/ML"))
        .unwrap();

    let saved = session.save(&store).await.unwrap();
    assert_eq!(store.calls(), vec!["find", "create"]);
    assert_eq!(saved.slots.len(), 1);
    assert_eq!(session.existing_id(), Some(saved.id));
}

#[tokio::test]
async fn save_with_prior_timetable_deletes_then_creates() {
    let prior = persisted(vec![record(Weekday::Friday, "11:00", "12:00", "Old")]);
    let store = RecordingStore::new(Some(prior));
    let mut session = GridSession::new(test_key()).unwrap();

    session.save(&store).await.unwrap();
    assert_eq!(store.calls(), vec!["find", "delete", "create"]);
}

#[tokio::test]
async fn create_failure_after_delete_is_a_replace_window_error() {
    let prior = persisted(vec![record(Weekday::Friday, "11:00", "12:00", "Old")]);
    let mut store = RecordingStore::new(Some(prior));
    store.fail_create = true;

    let mut session = GridSession::new(test_key()).unwrap();
    let err = session.save(&store).await.unwrap_err();
    assert!(matches!(err, LabError::ReplaceWindow(_)));
    assert_eq!(store.calls(), vec!["find", "delete", "create"]);
}

#[tokio::test]
async fn create_failure_without_prior_is_not_a_replace_window_error() {
    let mut store = RecordingStore::new(None);
    store.fail_create = true;

    let mut session = GridSession::new(test_key()).unwrap();
    let err = session.save(&store).await.unwrap_err();
    assert!(matches!(err, LabError::Database(_)));
}

#[tokio::test]
async fn compose_and_save_end_to_end() {
    // Teacher selects (CSE-DS, year 2, 2024-25, section A) with no existing
    // timetable.
    let store = RecordingStore::new(None);
    let mut session = GridSession::new(test_key()).unwrap();
    assert!(session.assignments().is_empty());
    assert_eq!(session.definitions().len(), 1);

    // Drag {AI/ML, CS201, Dr. X} onto (Monday, 09:00-10:00).
    let row = session.definitions()[0].id;
    session
        .assign(Weekday::Monday, row, &template("AI/ML"))
        .unwrap();
    assert_eq!(session.assignments().len(), 1);

    // Save.
    let saved = session.save(&store).await.unwrap();
    assert_eq!(store.calls(), vec!["find", "create"]);
    assert_eq!(saved.slots.len(), 1);
    assert_eq!(saved.slots[0].day, Weekday::Monday);
    assert_eq!(saved.slots[0].start, t("09:00"));
    assert_eq!(saved.slots[0].subject, "AI/ML");
    assert_eq!(saved.slots[0].professor, "Dr. X");
}
