use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use tkb_core::config::Config;
use tkb_core::curriculum::{self, Curriculum};
use tkb_core::template::TemplateSet;
use tkb_core::{merge, week};

pub fn run(
    config_path: &Path,
    data_dir: &Path,
    start: &str,
    weeks: u32,
    strict: bool,
    output: &Path,
) -> Result<()> {
    if weeks == 0 {
        anyhow::bail!("--weeks must be at least 1");
    }

    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid start date '{}'. Expected YYYY-MM-DD", start))?;

    let config = Config::load_or_default(config_path)?;

    let curriculum = Curriculum::load(&data_dir.join("lesson-plan.json"))?;
    let titles = curriculum::load_week_titles(&data_dir.join("week-title.json"))?;
    let templates = TemplateSet::load(&data_dir.join("weeklySchedule.json"))?;

    if strict || config.strict {
        merge::validate(&curriculum, &templates, &config)?;
    }

    let records = merge::generate_schedule(start, weeks, &curriculum, &titles, &templates, &config);
    week::save_week_records(output, &records)?;

    println!("{} Generated {} weeks of schedule", "✓".green(), records.len());
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        let range = format!("Date range: {} to {}", first.start, last.end);
        println!("  {}", range.dimmed());
    }
    println!("  {}", format!("Output: {}", output.display()).dimmed());

    Ok(())
}
