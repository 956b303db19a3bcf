use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use weatherly_core::{ChartKind, Config, QuerySession};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherly", version, about = "Weather dashboard for any place name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current conditions, air quality and forecast for a place.
    Show {
        /// City or village name.
        place: String,

        /// Which forecast chart to draw.
        #[arg(long, value_enum, default_value_t = ChartArg::Temperature)]
        chart: ChartArg,

        /// Print the result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartArg {
    Temperature,
    Precipitation,
    Wind,
}

impl From<ChartArg> for ChartKind {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Temperature => ChartKind::Temperature,
            ChartArg::Precipitation => ChartKind::Precipitation,
            ChartArg::Wind => ChartKind::Wind,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, chart, json } => show(&place, chart.into(), json).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(place: &str, chart: ChartKind, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(base_url = %config.base_url, "Loaded configuration");

    let session = QuerySession::from_config(&config)?;

    let result = match session.search(place).await {
        Ok(result) => result,
        Err(err) => {
            return match err.user_message() {
                Some(message) => Err(anyhow::anyhow!(message)),
                // Superseded queries are dropped silently.
                None => Ok(()),
            };
        }
    };

    if json {
        let doc = render::json_document(&result, &config);
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render::dashboard(&result, chart, &config));
    }

    Ok(())
}
