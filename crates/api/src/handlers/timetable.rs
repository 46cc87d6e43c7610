use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use labwise_core::{
    errors::LabError,
    models::{SaveTimetableRequest, Timetable, TimetableKey},
    scheduler::GridSession,
};
use labwise_db::store::PgTimetableStore;
use uuid::Uuid;

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

/// Query parameters identifying one timetable key.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableQuery {
    pub department: String,
    pub year: u8,
    pub academic_year: String,
    pub section: String,
}

impl TimetableQuery {
    fn into_key(self) -> TimetableKey {
        TimetableKey {
            department: self.department,
            year: self.year,
            academic_year: self.academic_year,
            section: self.section,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTimetableResponse {
    pub deleted: bool,
}

#[axum::debug_handler]
pub async fn get_timetable(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<Timetable>, AppError> {
    let key = query.into_key();
    key.validate()?;

    let found = labwise_db::repositories::timetable::find_timetable(&state.db_pool, &key)
        .await
        .map_err(LabError::Database)?;

    let (timetable, assignments) = found
        .ok_or_else(|| LabError::NotFound(format!("No timetable for {}", key)))?;

    let timetable = timetable
        .into_timetable(&assignments)
        .map_err(LabError::Database)?;

    Ok(Json(timetable))
}

#[axum::debug_handler]
pub async fn save_timetable(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<SaveTimetableRequest>,
) -> Result<Json<Timetable>, AppError> {
    // Mutations are teacher-only; enforcement lives here at the boundary
    auth::require_teacher(&state, &headers).await?;

    // Rebuild the grid to run every engine invariant (catalog key, slot
    // durations, derived row overlaps, double-booked cells) before any
    // persistence call
    let session = GridSession::from_records(payload.key.clone(), &payload.slots)?;

    tracing::info!(
        "Saving timetable for {}: {} assignments",
        session.key(),
        payload.slots.len()
    );

    // Atomic replace: the delete of the prior aggregate and the insert of
    // the new one share one transaction
    let store = PgTimetableStore::new(state.db_pool.clone());
    let saved = store.replace(session.key(), &session.to_slot_records()).await?;

    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn delete_timetable(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTimetableResponse>, AppError> {
    auth::require_teacher(&state, &headers).await?;

    let deleted = labwise_db::repositories::timetable::delete_timetable(&state.db_pool, id)
        .await
        .map_err(LabError::Database)?;

    if !deleted {
        return Err(AppError(LabError::NotFound(format!(
            "Timetable with ID {} not found",
            id
        ))));
    }

    Ok(Json(DeleteTimetableResponse { deleted: true }))
}
