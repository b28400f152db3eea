//! Calendar events produced by the generator.
//!
//! Deliberately minimal: each run regenerates the whole calendar, so
//! events carry no identity beyond their fields and no update/delete
//! semantics.

use chrono::{NaiveDate, NaiveDateTime};

/// A single calendar event, ready for .ics serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// Event instants: whole-day dates, or local datetimes tagged with the
/// configured zone.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    Date(NaiveDate),
    Zoned { datetime: NaiveDateTime, tzid: String },
}
