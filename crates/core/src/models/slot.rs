use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LabError;

/// A minute of the day, `0..1440`, displayed as zero-padded `"HH:MM"`.
///
/// Because the string form is zero-padded, lexicographic order on the wire
/// representation equals the numeric order used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(u16);

pub const MINUTES_PER_DAY: u16 = 24 * 60;

impl SlotTime {
    pub fn new(minutes: u16) -> Result<Self, LabError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(LabError::Validation(format!(
                "minute-of-day {} is out of range",
                minutes
            )));
        }
        Ok(SlotTime(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Result<Self, LabError> {
        if hour >= 24 || minute >= 60 {
            return Err(LabError::Validation(format!(
                "{:02}:{:02} is not a valid time of day",
                hour, minute
            )));
        }
        Ok(SlotTime(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Advances by `delta` minutes, or `None` when the result would cross
    /// midnight.
    pub fn plus_minutes(self, delta: u16) -> Option<Self> {
        let total = self.0.checked_add(delta)?;
        (total < MINUTES_PER_DAY).then_some(SlotTime(total))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for SlotTime {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LabError::Validation(format!("'{}' is not a valid HH:MM time", s));
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;
        SlotTime::from_hm(hour, minute)
    }
}

impl TryFrom<String> for SlotTime {
    type Error = LabError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.to_string()
    }
}

/// One of the five teaching days in the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| LabError::Validation(format!("'{}' is not a teaching day", s)))
    }
}

/// Whether a grid row carries classes or is a break (lunch, short recess).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Class,
    Break,
}

/// A row header in the weekly grid: a bounded time interval with a kind.
///
/// The `id` is transient, used only to address the definition during an
/// editing session; definitions are never persisted independently of the
/// assignments that reference their minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotDefinition {
    pub id: Uuid,
    pub start: SlotTime,
    pub end: SlotTime,
    pub kind: SlotKind,
    /// Shown in place of class cells, only meaningful when `kind == Break`
    pub label: Option<String>,
}

impl TimeSlotDefinition {
    pub fn class(start: SlotTime, end: SlotTime) -> Self {
        TimeSlotDefinition {
            id: Uuid::new_v4(),
            start,
            end,
            kind: SlotKind::Class,
            label: None,
        }
    }

    pub fn interval(&self) -> (SlotTime, SlotTime) {
        (self.start, self.end)
    }
}

/// A reusable (subject, code, professor) triple a teacher drags onto the
/// grid. Session-only; consumed into a [`ClassAssignment`] on drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTemplate {
    pub subject: String,
    pub subject_code: String,
    pub professor: String,
}

/// An occupied cell: one class on one day in one time slot.
///
/// The `id` is transient, minted fresh on every load; the persisted identity
/// lives in the database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAssignment {
    pub id: Uuid,
    pub day: Weekday,
    pub start: SlotTime,
    pub end: SlotTime,
    pub subject: String,
    pub subject_code: String,
    pub professor: String,
}
