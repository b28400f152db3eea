mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tkb_core::config::GeneratorMode;

#[derive(Parser)]
#[command(name = "tkb")]
#[command(about = "Merge lesson plans into weekly timetables and export them as .ics calendars")]
struct Cli {
    /// Config file (falls back to the user config dir, then defaults)
    #[arg(short, long, default_value = "tkb.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Merge the source tables into a weekly timetable
    Merge {
        /// Directory with lesson-plan.json, week-title.json and weeklySchedule.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Monday of week 1 (YYYY-MM-DD)
        #[arg(long, default_value = "2025-09-08")]
        start: String,

        /// Number of weeks to generate
        #[arg(long, default_value_t = 35)]
        weeks: u32,

        /// Fail on unmapped subjects or sessions instead of emitting empty fields
        #[arg(long)]
        strict: bool,

        /// Where to write the merged timetable
        #[arg(short, long, default_value = "timetable.json")]
        output: PathBuf,
    },
    /// Convert a merged timetable into an .ics calendar
    Convert {
        /// The merged timetable produced by `tkb merge`
        #[arg(long, default_value = "timetable.json")]
        input: PathBuf,

        /// Override the configured generator mode
        #[arg(long)]
        mode: Option<Mode>,

        /// Where to write the calendar
        #[arg(short, long, default_value = "timetable.ics")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Session,
    DayAggregate,
}

impl From<Mode> for GeneratorMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Session => GeneratorMode::Session,
            Mode::DayAggregate => GeneratorMode::DayAggregate,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init::run(&cli.config, force),
        Commands::Merge {
            data_dir,
            start,
            weeks,
            strict,
            output,
        } => commands::merge::run(&cli.config, &data_dir, &start, weeks, strict, &output),
        Commands::Convert {
            input,
            mode,
            output,
        } => commands::convert::run(&cli.config, &input, mode.map(Mode::into), &output),
    }
}
