use crate::models::{PlantDraft, SunTolerance};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plantops",
    version,
    about = "Houseplant care TUI with weather-adjusted watering"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test the weather provider
    Check,
    /// List plants with their next watering
    List,
    /// Add a plant from the catalog, or by hand with --manual
    Add {
        /// Common, scientific, or alternative name
        name: String,

        #[command(flatten)]
        manual: ManualPlant,
    },
    /// Record a watering
    Water {
        /// Plant id, id prefix, or common name
        id: String,
    },
    /// Remove a plant from the garden
    Remove {
        /// Plant id, id prefix, or common name
        id: String,
    },
    /// Show the watering agenda
    Schedule,
    /// Evaluate health alerts against current weather
    Alerts,
    /// Export the next watering as a calendar reminder
    Export {
        /// Plant id, id prefix, or common name
        id: String,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Ics)]
        format: ExportFormat,

        /// Where to write the .ics file (defaults to the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Care details for a plant entered by hand. Giving any of them implies
/// `--manual`.
#[derive(Args, Debug, Default)]
pub struct ManualPlant {
    /// Skip the catalog and use NAME as the common name
    #[arg(long)]
    pub manual: bool,

    #[arg(long)]
    pub scientific: Option<String>,

    /// Days between waterings [default: 7]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=3650))]
    pub frequency: Option<u32>,

    /// shade, partial or full-sun [default: partial]
    #[arg(long, value_parser = parse_sun)]
    pub sun: Option<SunTolerance>,

    /// Lowest comfortable temperature in °C [default: 10]
    #[arg(long, allow_hyphen_values = true)]
    pub min_temp: Option<f64>,

    /// Highest comfortable temperature in °C [default: 35]
    #[arg(long, allow_hyphen_values = true)]
    pub max_temp: Option<f64>,

    /// Free-text category such as Suculenta or Tropical [default: Geral]
    #[arg(long)]
    pub category: Option<String>,
}

impl ManualPlant {
    pub fn is_requested(&self) -> bool {
        self.manual
            || self.scientific.is_some()
            || self.frequency.is_some()
            || self.sun.is_some()
            || self.min_temp.is_some()
            || self.max_temp.is_some()
            || self.category.is_some()
    }

    pub fn into_draft(self, common_name: String) -> PlantDraft {
        PlantDraft {
            common_name,
            scientific_name: self.scientific,
            watering_frequency_days: self.frequency,
            sun_tolerance: self.sun,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            category: self.category,
        }
    }
}

fn parse_sun(s: &str) -> Result<SunTolerance, String> {
    SunTolerance::from_str(s).ok_or_else(|| format!("unknown sun tolerance '{}'", s))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Ics,
    Google,
    Outlook,
}
