//! Fixed academic vocabulary a timetable key is validated against.
//!
//! These mirror the institution's published departments and sections; a key
//! built from anything outside these sets never reaches persistence.

pub const DEPARTMENTS: [&str; 7] = ["CSE", "CSE-DS", "ECE", "EEE", "CEE", "MCE", "ISE"];

pub const ACADEMIC_YEARS: [&str; 3] = ["2023-24", "2024-25", "2025-26"];

pub const SECTIONS: [&str; 5] = ["A", "B", "C", "D", "E"];

pub const MIN_YEAR: u8 = 1;
pub const MAX_YEAR: u8 = 4;

pub fn is_department(value: &str) -> bool {
    DEPARTMENTS.contains(&value)
}

pub fn is_academic_year(value: &str) -> bool {
    ACADEMIC_YEARS.contains(&value)
}

pub fn is_section(value: &str) -> bool {
    SECTIONS.contains(&value)
}

pub fn is_year(value: u8) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&value)
}
