//! Source tables: the lesson curriculum and the week titles.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// One lesson topic, tied to a specific week of the school year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumEntry {
    pub week: u32,
    pub name: String,
}

/// The lesson curriculum, keyed by curriculum subject key (e.g. "math").
///
/// Entries for the same week keep their table order: the Nth entry for a
/// week fills the Nth grid slot requesting that subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curriculum(pub BTreeMap<String, Vec<CurriculumEntry>>);

impl Curriculum {
    /// All entries for a subject key in a given week, in table order.
    pub fn lessons_for(&self, key: &str, week: u32) -> Vec<&CurriculumEntry> {
        self.0
            .get(key)
            .map(|entries| entries.iter().filter(|e| e.week == week).collect())
            .unwrap_or_default()
    }

    pub fn load(path: &Path) -> ScheduleResult<Self> {
        read_json(path)
    }
}

/// Display title for one week of the school year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekTitle {
    pub id: u32,
    pub name: String,
}

/// Resolve a week's display title, synthesizing one when absent.
pub fn title_for_week(titles: &[WeekTitle], week: u32) -> String {
    titles
        .iter()
        .find(|t| t.id == week)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("Tuần {}", week))
}

pub fn load_week_titles(path: &Path) -> ScheduleResult<Vec<WeekTitle>> {
    read_json(path)
}

/// Shared JSON loader for the input tables.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ScheduleResult<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ScheduleError::Serialization(format!("{}: {}", path.display(), e)))
}
