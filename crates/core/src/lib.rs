//! # LabWise Core
//!
//! Domain models and the timetable scheduling engine for the LabWise
//! timetable service.
//!
//! The crate is deliberately free of any web or database machinery: it owns
//! the weekly grid a teacher composes (time slot rows, class assignments),
//! the overlap and double-booking rules that keep the grid consistent, and
//! the replace-on-save contract against a persistence collaborator expressed
//! as the [`store::TimetableStore`] trait.

/// Fixed academic vocabulary: departments, years, academic years, sections
pub mod catalog;
/// Error taxonomy shared across the workspace
pub mod errors;
/// Domain models: slot times, definitions, assignments, timetables, users
pub mod models;
/// The grid editing session and its conflict rules
pub mod scheduler;
/// Persistence collaborator contract
pub mod store;
