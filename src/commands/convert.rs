use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tkb_core::config::{Config, GeneratorMode};
use tkb_core::{ics, week};

pub fn run(
    config_path: &Path,
    input: &Path,
    mode: Option<GeneratorMode>,
    output: &Path,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(mode) = mode {
        config.mode = mode;
    }

    let records = week::load_week_records(input)?;
    let calendar = ics::build_calendar(&records, &config)?;
    std::fs::write(output, &calendar)?;

    let events = calendar.matches("BEGIN:VEVENT").count();
    println!("{} Generated {} events", "✓".green(), events);
    println!("  {}", format!("Output: {}", output.display()).dimmed());

    Ok(())
}
