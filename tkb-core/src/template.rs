//! Weekly period-grid templates and the rules for picking one per week.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::curriculum::read_json;
use crate::error::ScheduleResult;

/// One slot of a weekly grid: a subject taught on a day and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSlot {
    /// 0 = Monday .. 4 = Friday.
    pub day: u8,
    #[serde(rename = "periodIndex")]
    pub period_index: u32,
    pub session: String,
    pub subject: String,
}

/// A reusable weekly grid, versioned by creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekTemplate {
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub entries: Vec<PeriodSlot>,
}

impl WeekTemplate {
    /// Slots for one day, ascending by period index.
    pub fn day_slots(&self, day: u8) -> Vec<&PeriodSlot> {
        let mut slots: Vec<&PeriodSlot> = self.entries.iter().filter(|e| e.day == day).collect();
        slots.sort_by_key(|e| e.period_index);
        slots
    }

    /// Whether this grid's creation timestamp starts on the marker date.
    fn created_on(&self, marker: NaiveDate) -> bool {
        self.created_at
            .starts_with(&marker.format("%Y-%m-%d").to_string())
    }
}

/// The template input: a single fixed grid, or a revision history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateSet {
    Single(WeekTemplate),
    Many(Vec<WeekTemplate>),
}

impl TemplateSet {
    pub fn load(path: &Path) -> ScheduleResult<Self> {
        read_json(path)
    }

    /// Templates in input order. A single grid is its own one-entry list.
    pub fn candidates(&self) -> &[WeekTemplate] {
        match self {
            TemplateSet::Single(template) => std::slice::from_ref(template),
            TemplateSet::Many(templates) => templates,
        }
    }
}

/// One row of the template-selection policy: weeks in
/// `from_week..=to_week` prefer the grid created on `marker`, falling
/// back to the grid at index `fallback` in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRule {
    pub from_week: u32,
    pub to_week: u32,
    pub marker: NaiveDate,
    pub fallback: usize,
}

impl SelectionRule {
    fn applies_to(&self, week: u32) -> bool {
        (self.from_week..=self.to_week).contains(&week)
    }
}

/// Pick the grid in effect for a week.
///
/// Rules are evaluated top-down and the first one covering the week
/// applies. Weeks covered by no rule use the first grid in input order.
/// A single (non-array) template input bypasses selection entirely.
pub fn select_template<'a>(
    week: u32,
    templates: &'a TemplateSet,
    rules: &[SelectionRule],
) -> Option<&'a WeekTemplate> {
    if let TemplateSet::Single(template) = templates {
        return Some(template);
    }

    let candidates = templates.candidates();

    match rules.iter().find(|r| r.applies_to(week)) {
        Some(rule) => candidates
            .iter()
            .find(|t| t.created_on(rule.marker))
            .or_else(|| candidates.get(rule.fallback))
            .or_else(|| candidates.first()),
        None => candidates.first(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, created_at: &str) -> WeekTemplate {
        WeekTemplate {
            name: name.to_string(),
            created_at: created_at.to_string(),
            entries: vec![],
        }
    }

    fn rules() -> Vec<SelectionRule> {
        vec![
            SelectionRule {
                from_week: 1,
                to_week: 10,
                marker: NaiveDate::from_ymd_opt(2024, 9, 17).unwrap(),
                fallback: 0,
            },
            SelectionRule {
                from_week: 12,
                to_week: 18,
                marker: NaiveDate::from_ymd_opt(2025, 11, 21).unwrap(),
                fallback: 1,
            },
        ]
    }

    fn revisions() -> TemplateSet {
        TemplateSet::Many(vec![
            template("HK1", "2024-09-17T08:00:00Z"),
            template("HK2", "2025-11-21T08:00:00Z"),
        ])
    }

    #[test]
    fn test_early_weeks_select_the_early_marker() {
        let set = revisions();

        for week in [1, 5, 10] {
            let selected = select_template(week, &set, &rules()).unwrap();
            assert_eq!(selected.name, "HK1", "week {}", week);
        }
    }

    #[test]
    fn test_late_weeks_select_the_late_marker() {
        let set = revisions();

        for week in [12, 15, 18] {
            let selected = select_template(week, &set, &rules()).unwrap();
            assert_eq!(selected.name, "HK2", "week {}", week);
        }
    }

    #[test]
    fn test_uncovered_weeks_select_the_first_grid() {
        let set = revisions();

        for week in [11, 19, 20, 35] {
            let selected = select_template(week, &set, &rules()).unwrap();
            assert_eq!(selected.name, "HK1", "week {}", week);
        }
    }

    #[test]
    fn test_missing_marker_uses_the_rule_fallback_index() {
        let set = TemplateSet::Many(vec![
            template("A", "2023-01-01T00:00:00Z"),
            template("B", "2023-06-01T00:00:00Z"),
        ]);

        // Early rule falls back to index 0, late rule to index 1.
        assert_eq!(select_template(5, &set, &rules()).unwrap().name, "A");
        assert_eq!(select_template(15, &set, &rules()).unwrap().name, "B");
    }

    #[test]
    fn test_out_of_range_fallback_index_uses_the_first_grid() {
        let set = TemplateSet::Many(vec![template("A", "2023-01-01T00:00:00Z")]);

        // Late rule's fallback index 1 does not exist here.
        assert_eq!(select_template(15, &set, &rules()).unwrap().name, "A");
    }

    #[test]
    fn test_single_template_bypasses_selection() {
        let set = TemplateSet::Single(template("Only", "2020-01-01T00:00:00Z"));

        for week in [1, 11, 15, 30] {
            assert_eq!(select_template(week, &set, &rules()).unwrap().name, "Only");
        }
    }

    #[test]
    fn test_empty_collection_selects_nothing() {
        let set = TemplateSet::Many(vec![]);

        assert!(select_template(1, &set, &rules()).is_none());
    }

    #[test]
    fn test_template_set_parses_object_or_array() {
        let object = r#"{"name": "HK1", "createdAt": "2024-09-17T08:00:00Z", "entries": []}"#;
        let array = format!("[{}]", object);

        assert!(matches!(
            serde_json::from_str::<TemplateSet>(object).unwrap(),
            TemplateSet::Single(_)
        ));
        assert!(matches!(
            serde_json::from_str::<TemplateSet>(&array).unwrap(),
            TemplateSet::Many(_)
        ));
    }

    #[test]
    fn test_day_slots_sorts_by_period() {
        let grid = WeekTemplate {
            name: "HK1".to_string(),
            created_at: "2024-09-17T08:00:00Z".to_string(),
            entries: vec![
                PeriodSlot { day: 0, period_index: 3, session: "Sáng".into(), subject: "Toán".into() },
                PeriodSlot { day: 0, period_index: 1, session: "Sáng".into(), subject: "Tiếng Việt".into() },
                PeriodSlot { day: 1, period_index: 2, session: "Sáng".into(), subject: "TNXH".into() },
            ],
        };

        let monday: Vec<u32> = grid.day_slots(0).iter().map(|s| s.period_index).collect();

        assert_eq!(monday, vec![1, 3]);
    }
}
