use chrono::Utc;
use eyre::Result;
use labwise_core::models::{SlotRecord, TimetableKey};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbSlotAssignment, DbTimetable};

pub async fn find_timetable(
    pool: &Pool<Postgres>,
    key: &TimetableKey,
) -> Result<Option<(DbTimetable, Vec<DbSlotAssignment>)>> {
    tracing::debug!("Finding timetable for key: {}", key);

    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        SELECT id, department, year, academic_year, section, created_at, updated_at
        FROM timetables
        WHERE department = $1 AND year = $2 AND academic_year = $3 AND section = $4
        "#,
    )
    .bind(&key.department)
    .bind(i32::from(key.year))
    .bind(&key.academic_year)
    .bind(&key.section)
    .fetch_optional(pool)
    .await?;

    let Some(timetable) = timetable else {
        tracing::debug!("No timetable for key: {}", key);
        return Ok(None);
    };

    let assignments = get_assignments(pool, timetable.id).await?;
    tracing::debug!(
        "Timetable found: id={}, {} assignments",
        timetable.id,
        assignments.len()
    );
    Ok(Some((timetable, assignments)))
}

pub async fn get_assignments(
    pool: &Pool<Postgres>,
    timetable_id: Uuid,
) -> Result<Vec<DbSlotAssignment>> {
    let assignments = sqlx::query_as::<_, DbSlotAssignment>(
        r#"
        SELECT id, timetable_id, day, start_time, end_time, subject, subject_code, professor
        FROM slot_assignments
        WHERE timetable_id = $1
        ORDER BY start_time ASC, day ASC
        "#,
    )
    .bind(timetable_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

pub async fn create_timetable(
    pool: &Pool<Postgres>,
    key: &TimetableKey,
    slots: &[SlotRecord],
) -> Result<(DbTimetable, Vec<DbSlotAssignment>)> {
    let mut tx = pool.begin().await?;
    let timetable = insert_timetable(&mut tx, key).await?;
    let assignments = insert_assignments(&mut tx, timetable.id, slots).await?;
    tx.commit().await?;

    tracing::debug!(
        "Timetable created: id={}, {} assignments",
        timetable.id,
        assignments.len()
    );
    Ok((timetable, assignments))
}

/// Deletes a timetable and, via the FK cascade, its assignments. Returns
/// whether a row existed.
pub async fn delete_timetable(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting timetable: id={}", id);

    let result = sqlx::query(
        r#"
        DELETE FROM timetables
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replaces the timetable for `key` in a single transaction: any prior row
/// for the key is deleted and the new aggregate inserted, so the key never
/// observably holds zero timetables mid-save.
pub async fn replace_timetable(
    pool: &Pool<Postgres>,
    key: &TimetableKey,
    slots: &[SlotRecord],
) -> Result<(DbTimetable, Vec<DbSlotAssignment>)> {
    tracing::debug!("Replacing timetable for key: {}", key);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM timetables
        WHERE department = $1 AND year = $2 AND academic_year = $3 AND section = $4
        "#,
    )
    .bind(&key.department)
    .bind(i32::from(key.year))
    .bind(&key.academic_year)
    .bind(&key.section)
    .execute(&mut *tx)
    .await?;

    let timetable = insert_timetable(&mut tx, key).await?;
    let assignments = insert_assignments(&mut tx, timetable.id, slots).await?;

    tx.commit().await?;

    tracing::debug!(
        "Timetable replaced: id={}, {} assignments",
        timetable.id,
        assignments.len()
    );
    Ok((timetable, assignments))
}

async fn insert_timetable(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    key: &TimetableKey,
) -> Result<DbTimetable> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        INSERT INTO timetables (id, department, year, academic_year, section, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, department, year, academic_year, section, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&key.department)
    .bind(i32::from(key.year))
    .bind(&key.academic_year)
    .bind(&key.section)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;

    Ok(timetable)
}

async fn insert_assignments(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    timetable_id: Uuid,
    slots: &[SlotRecord],
) -> Result<Vec<DbSlotAssignment>> {
    let mut assignments = Vec::with_capacity(slots.len());
    for slot in slots {
        let assignment = sqlx::query_as::<_, DbSlotAssignment>(
            r#"
            INSERT INTO slot_assignments
                (id, timetable_id, day, start_time, end_time, subject, subject_code, professor)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, timetable_id, day, start_time, end_time, subject, subject_code, professor
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(timetable_id)
        .bind(slot.day.as_str())
        .bind(slot.start.to_string())
        .bind(slot.end.to_string())
        .bind(&slot.subject)
        .bind(&slot.subject_code)
        .bind(&slot.professor)
        .fetch_one(&mut **tx)
        .await?;
        assignments.push(assignment);
    }
    Ok(assignments)
}
