//! Core types and transformations for the tkb timetable tools.
//!
//! Two independent passes share the types in this crate:
//! - `merge` combines the lesson curriculum, week titles and weekly grid
//!   templates into per-week schedule records
//! - `ics` turns those records into a calendar document
//!
//! Both passes are pure, single-threaded transformations over fully
//! loaded input; all policy (time tables, template selection, equipment
//! lists) lives in `config`.

pub mod config;
pub mod curriculum;
pub mod error;
pub mod event;
pub mod ics;
pub mod merge;
pub mod template;
pub mod week;

pub use error::{ScheduleError, ScheduleResult};
