//! Calendar (.ics) output.

pub mod generate;

pub use generate::build_calendar;
