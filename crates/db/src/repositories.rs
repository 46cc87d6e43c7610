pub mod timetable;
pub mod user;
