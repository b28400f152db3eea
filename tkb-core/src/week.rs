//! Generated weekly schedule records.
//!
//! These are the intermediate artifact between `tkb merge` and
//! `tkb convert`, serialized as `timetable.json`. Field names follow the
//! merged document's schema (`weekNumber`, `isBold`, ...), so the file
//! stays readable and diffable on its own.

use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::curriculum::read_json;
use crate::error::{ScheduleError, ScheduleResult};

/// Teaching-material flags for one lesson.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub has: bool,
    #[serde(rename = "selfMade")]
    pub self_made: bool,
}

/// One taught period of a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSlot {
    /// Display subject name (e.g. "Toán").
    pub name: String,
    pub session: String,
    pub period: u32,
    /// Lesson topic; empty when the curriculum has nothing left for this
    /// subject and week.
    pub lesson: String,
    pub equipment: Equipment,
    pub adjustments: String,
    /// Set exactly when `lesson` is empty, flagging the slot for attention.
    #[serde(rename = "isBold")]
    pub is_bold: bool,
}

/// The grid a week was generated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRef {
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// One fully generated week, Monday through Friday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRecord {
    #[serde(rename = "weekNumber")]
    pub week_number: u32,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Absent when the template collection was empty.
    #[serde(rename = "weeklySchedule")]
    pub weekly_schedule: Option<TemplateRef>,
    pub monday: Vec<LessonSlot>,
    pub tuesday: Vec<LessonSlot>,
    pub wednesday: Vec<LessonSlot>,
    pub thursday: Vec<LessonSlot>,
    pub friday: Vec<LessonSlot>,
}

/// Vietnamese day labels, Monday first.
pub const DAY_LABELS: [&str; 5] = ["Thứ Hai", "Thứ Ba", "Thứ Tư", "Thứ Năm", "Thứ Sáu"];

impl WeekRecord {
    /// Days in fixed Monday..Friday order.
    pub fn days(&self) -> [&[LessonSlot]; 5] {
        [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
        ]
    }

    /// Calendar date of a day within this week (0 = Monday).
    pub fn date_of(&self, day: u8) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(day as u64))
            .unwrap_or(self.start)
    }
}

pub fn load_week_records(path: &Path) -> ScheduleResult<Vec<WeekRecord>> {
    read_json(path)
}

/// Write the merged timetable, fully replacing any prior file.
pub fn save_week_records(path: &Path, weeks: &[WeekRecord]) -> ScheduleResult<()> {
    let json = serde_json::to_string_pretty(weeks)
        .map_err(|e| ScheduleError::Serialization(e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WeekRecord {
        WeekRecord {
            week_number: 3,
            title: "Tuần 3".to_string(),
            start: NaiveDate::from_ymd_opt(2025, 9, 22).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 9, 26).unwrap(),
            weekly_schedule: Some(TemplateRef {
                name: "HK1".to_string(),
                created_at: "2024-09-17T08:00:00Z".to_string(),
            }),
            monday: vec![],
            tuesday: vec![],
            wednesday: vec![],
            thursday: vec![],
            friday: vec![],
        }
    }

    #[test]
    fn test_date_of_walks_the_week() {
        let week = record();

        assert_eq!(week.date_of(0), NaiveDate::from_ymd_opt(2025, 9, 22).unwrap());
        assert_eq!(week.date_of(4), NaiveDate::from_ymd_opt(2025, 9, 26).unwrap());
    }

    #[test]
    fn test_serialized_field_names_match_the_timetable_schema() {
        let mut week = record();
        week.monday.push(LessonSlot {
            name: "Toán".to_string(),
            session: "Sáng".to_string(),
            period: 1,
            lesson: String::new(),
            equipment: Equipment::default(),
            adjustments: String::new(),
            is_bold: true,
        });

        let json = serde_json::to_string(&week).unwrap();

        for field in ["weekNumber", "weeklySchedule", "createdAt", "isBold", "selfMade"] {
            assert!(json.contains(field), "missing '{}' in {}", field, json);
        }
        assert!(json.contains("\"start\":\"2025-09-22\""), "dates should be plain YYYY-MM-DD: {}", json);
    }
}
