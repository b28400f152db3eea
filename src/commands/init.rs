use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tkb_core::config::Config;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    Config::default().save(path)?;

    println!("{} Wrote default config to {}", "✓".green(), path.display());

    Ok(())
}
