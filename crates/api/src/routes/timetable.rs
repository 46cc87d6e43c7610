use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/time-table", get(handlers::timetable::get_timetable))
        .route("/api/time-table", post(handlers::timetable::save_timetable))
        .route(
            "/api/time-table/:id",
            delete(handlers::timetable::delete_timetable),
        )
}
