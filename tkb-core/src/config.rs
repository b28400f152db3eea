//! Generator configuration.
//!
//! Everything the merge and calendar steps treat as policy lives here:
//! time-slot tables, the template-selection rules, the equipment policy
//! and the output settings. The built-in defaults reproduce the school
//! year this tool was first written for, and `tkb init` writes them out
//! as a TOML file for editing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::template::SelectionRule;

/// How lesson slots are turned into calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorMode {
    /// One event per lesson slot, timed by its session window.
    Session,
    /// One event per day, spanning the day's first to last period.
    DayAggregate,
}

/// A fixed wall-clock window, serialized as "HH:MM" strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// Wall-clock window for one numbered period of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub period: u32,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl PeriodWindow {
    fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// Which subjects require teaching materials, by display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPolicy {
    /// Subjects taught with school-provided equipment.
    pub provided: Vec<String>,
    /// Subjects taught with self-made materials.
    pub self_made: Vec<String>,
}

/// Configuration for both the merge and the calendar steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Calendar display name; defaults to the first week's title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_name: Option<String>,

    /// IANA zone id applied uniformly to every generated instant.
    pub timezone: String,

    pub mode: GeneratorMode,

    /// In day-aggregate mode, emit all-day events instead of timed spans.
    pub all_day: bool,

    /// Fail on unmapped subjects/sessions instead of emitting empty fields.
    pub strict: bool,

    /// Fallback window for sessions and periods with no configured time.
    pub default_window: TimeWindow,

    /// Session label (e.g. "Sáng") to wall-clock window.
    pub session_times: BTreeMap<String, TimeWindow>,

    /// Per-period wall-clock windows, used by day-aggregate mode.
    pub period_times: Vec<PeriodWindow>,

    /// Display subject name to curriculum key (e.g. "Toán" -> "math").
    pub subject_keys: BTreeMap<String, String>,

    pub equipment: EquipmentPolicy,

    /// Ordered template-selection policy, evaluated top-down per week.
    pub selection_rules: Vec<SelectionRule>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_name: None,
            timezone: "Asia/Ho_Chi_Minh".to_string(),
            mode: GeneratorMode::Session,
            all_day: false,
            strict: false,
            default_window: window(7, 0, 9, 0),
            session_times: BTreeMap::from([
                ("Sáng".to_string(), window(7, 0, 9, 0)),
                ("Chiều".to_string(), window(13, 30, 15, 30)),
            ]),
            period_times: vec![
                period(1, 7, 0, 7, 35),
                period(2, 7, 40, 8, 15),
                period(3, 8, 45, 9, 20),
                period(4, 9, 25, 10, 0),
                period(5, 10, 5, 10, 40),
                period(6, 13, 30, 14, 5),
                period(7, 14, 10, 14, 45),
                period(8, 15, 15, 15, 50),
            ],
            subject_keys: BTreeMap::from([
                ("Tiếng Việt".to_string(), "literature".to_string()),
                ("Toán".to_string(), "math".to_string()),
                ("HĐTN".to_string(), "hdtn".to_string()),
                ("TNXH".to_string(), "tnxh".to_string()),
                ("LS-ĐL".to_string(), "history".to_string()),
            ]),
            equipment: EquipmentPolicy {
                provided: vec!["HĐTN".to_string(), "TNXH".to_string()],
                self_made: vec![
                    "Tiếng Việt".to_string(),
                    "Toán".to_string(),
                    "Tiếng Anh".to_string(),
                ],
            },
            selection_rules: vec![
                SelectionRule {
                    from_week: 1,
                    to_week: 10,
                    marker: date(2024, 9, 17),
                    fallback: 0,
                },
                SelectionRule {
                    from_week: 12,
                    to_week: 18,
                    marker: date(2025, 11, 21),
                    fallback: 1,
                },
            ],
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> ScheduleResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ScheduleError::Config(e.to_string()))
    }

    /// Save config as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ScheduleResult<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ScheduleError::Config(e.to_string()))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Resolve config: the given path, then the user config directory,
    /// then built-in defaults.
    pub fn load_or_default(path: &Path) -> ScheduleResult<Self> {
        if path.exists() {
            return Self::load(path);
        }

        if let Some(global) = Self::global_path() {
            if global.exists() {
                return Self::load(&global);
            }
        }

        Ok(Self::default())
    }

    /// Shared config at ~/.config/tkb/config.toml
    pub fn global_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("tkb").join("config.toml"))
    }

    /// Window for a session label, falling back to the default window.
    pub fn session_window(&self, session: &str) -> TimeWindow {
        self.session_times
            .get(session)
            .copied()
            .unwrap_or(self.default_window)
    }

    /// Window for a period index, falling back to the default window.
    pub fn period_window(&self, period: u32) -> TimeWindow {
        self.period_times
            .iter()
            .find(|p| p.period == period)
            .map(PeriodWindow::window)
            .unwrap_or(self.default_window)
    }
}

fn window(sh: u32, sm: u32, eh: u32, em: u32) -> TimeWindow {
    TimeWindow {
        start: NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
        end: NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
    }
}

fn period(index: u32, sh: u32, sm: u32, eh: u32, em: u32) -> PeriodWindow {
    PeriodWindow {
        period: index,
        start: NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
        end: NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Serialize NaiveTime as "HH:MM".
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M").map_err(|_| {
            serde::de::Error::custom(format!("Invalid time '{}'. Expected HH:MM", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config, "TOML roundtrip changed the config:\n{}", toml_str);
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let config: Config = toml::from_str("timezone = \"UTC\"").unwrap();

        assert_eq!(config.timezone, "UTC");
        assert_eq!(config.mode, GeneratorMode::Session);
        assert_eq!(config.selection_rules.len(), 2);
        assert!(config.session_times.contains_key("Sáng"));
    }

    #[test]
    fn test_unknown_session_falls_back_to_default_window() {
        let config = Config::default();

        assert_eq!(config.session_window("Tối"), config.default_window);
        assert_ne!(config.session_window("Chiều"), config.default_window);
    }

    #[test]
    fn test_unknown_period_falls_back_to_default_window() {
        let config = Config::default();

        assert_eq!(config.period_window(99), config.default_window);
        assert_eq!(
            config.period_window(2).start,
            NaiveTime::from_hms_opt(7, 40, 0).unwrap()
        );
    }

    #[test]
    fn test_time_window_parses_hhmm_strings() {
        let window: TimeWindow = toml::from_str("start = \"07:00\"\nend = \"09:00\"").unwrap();

        assert_eq!(window.start, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(window.end, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_time_string_is_rejected() {
        let result: Result<TimeWindow, _> = toml::from_str("start = \"7am\"\nend = \"09:00\"");

        assert!(result.is_err());
    }
}
