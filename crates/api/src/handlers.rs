pub mod auth;
pub mod timetable;
