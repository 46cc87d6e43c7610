pub mod slot;
pub mod timetable;
pub mod user;

pub use slot::{ClassAssignment, SlotKind, SlotTemplate, SlotTime, TimeSlotDefinition, Weekday};
pub use timetable::{SaveTimetableRequest, SlotRecord, Timetable, TimetableKey};
pub use user::{LoginRequest, LoginResponse, Role, SignupRequest, User};
