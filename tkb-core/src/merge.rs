//! Merging the source tables into per-week schedule records.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::config::Config;
use crate::curriculum::{Curriculum, WeekTitle, title_for_week};
use crate::error::{ScheduleError, ScheduleResult};
use crate::template::{PeriodSlot, TemplateSet, select_template};
use crate::week::{Equipment, LessonSlot, TemplateRef, WeekRecord};

/// Merge the curriculum, week titles and grid templates into one record
/// per week, numbered 1..=`weeks`.
///
/// Incomplete input degrades to empty fields; nothing here aborts the
/// batch. Callers wanting hard failures run [`validate`] first.
pub fn generate_schedule(
    start: NaiveDate,
    weeks: u32,
    curriculum: &Curriculum,
    titles: &[WeekTitle],
    templates: &TemplateSet,
    config: &Config,
) -> Vec<WeekRecord> {
    (1..=weeks)
        .map(|week| generate_week(start, week, curriculum, titles, templates, config))
        .collect()
}

fn generate_week(
    start: NaiveDate,
    week: u32,
    curriculum: &Curriculum,
    titles: &[WeekTitle],
    templates: &TemplateSet,
    config: &Config,
) -> WeekRecord {
    // Calendar-day arithmetic only: a naive date plus whole days cannot
    // shift across DST transitions.
    let week_start = start
        .checked_add_days(Days::new((week as u64 - 1) * 7))
        .unwrap_or(start);
    let week_end = week_start
        .checked_add_days(Days::new(4))
        .unwrap_or(week_start);

    let template = select_template(week, templates, &config.selection_rules);

    let mut record = WeekRecord {
        week_number: week,
        title: title_for_week(titles, week),
        start: week_start,
        end: week_end,
        weekly_schedule: template.map(|t| TemplateRef {
            name: t.name.clone(),
            created_at: t.created_at.clone(),
        }),
        monday: vec![],
        tuesday: vec![],
        wednesday: vec![],
        thursday: vec![],
        friday: vec![],
    };

    let Some(template) = template else {
        return record;
    };

    // One lesson counter per display subject, living only for this week.
    let mut counters: HashMap<String, usize> = HashMap::new();

    for day in 0..5u8 {
        let slots: Vec<LessonSlot> = template
            .day_slots(day)
            .into_iter()
            .map(|entry| fill_slot(entry, week, curriculum, config, &mut counters))
            .collect();

        match day {
            0 => record.monday = slots,
            1 => record.tuesday = slots,
            2 => record.wednesday = slots,
            3 => record.thursday = slots,
            _ => record.friday = slots,
        }
    }

    record
}

/// Resolve one grid slot against the curriculum.
///
/// The lesson name comes from the next unconsumed entry for this subject
/// and week; when the curriculum runs out (or the subject has no key
/// mapping at all) the slot stays empty and is flagged for attention.
fn fill_slot(
    entry: &PeriodSlot,
    week: u32,
    curriculum: &Curriculum,
    config: &Config,
    counters: &mut HashMap<String, usize>,
) -> LessonSlot {
    let lessons = config
        .subject_keys
        .get(&entry.subject)
        .map(|key| curriculum.lessons_for(key, week))
        .unwrap_or_default();

    let counter = counters.entry(entry.subject.clone()).or_insert(0);

    let lesson = if *counter < lessons.len() {
        let name = lessons[*counter].name.clone();
        *counter += 1;
        name
    } else {
        String::new()
    };

    let filled = !lesson.is_empty();

    LessonSlot {
        name: entry.subject.clone(),
        session: entry.session.clone(),
        period: entry.period_index,
        equipment: Equipment {
            has: filled && config.equipment.provided.iter().any(|s| s == &entry.subject),
            self_made: filled && config.equipment.self_made.iter().any(|s| s == &entry.subject),
        },
        adjustments: String::new(),
        is_bold: !filled,
        lesson,
    }
}

/// Opt-in strict validation; default behavior stays best-effort.
///
/// Reports grid subjects with no curriculum key mapping, mapped keys the
/// curriculum has no entries for, and sessions with no configured window.
pub fn validate(
    curriculum: &Curriculum,
    templates: &TemplateSet,
    config: &Config,
) -> ScheduleResult<()> {
    let mut problems = Vec::new();

    for template in templates.candidates() {
        for entry in &template.entries {
            match config.subject_keys.get(&entry.subject) {
                None => problems.push(format!(
                    "template '{}': subject '{}' has no curriculum key mapping",
                    template.name, entry.subject
                )),
                Some(key) if !curriculum.0.contains_key(key) => problems.push(format!(
                    "template '{}': curriculum has no entries for '{}'",
                    template.name, key
                )),
                Some(_) => {}
            }

            if !config.session_times.contains_key(&entry.session) {
                problems.push(format!(
                    "template '{}': session '{}' has no configured time window",
                    template.name, entry.session
                ));
            }
        }
    }

    problems.sort();
    problems.dedup();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ScheduleError::Validation(problems.join("\n")))
    }
}
