use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::Weekday;
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::{
    Config, LocationQuery, UnitPreferences, UnitSystem, WeatherSession,
    clock::parse_weekday, provider_from_config,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "City weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, default city and units.
    Configure,

    /// Show current conditions, the day strip and the hourly timeline.
    Show {
        /// City name; defaults to the configured city.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Overrides the configured units.
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,

        /// Weekday for the hourly timeline, e.g. "tuesday". Defaults to today.
        #[arg(long, value_parser = parse_day)]
        day: Option<Weekday>,

        /// Keep ticking the city's local clock until Ctrl-C.
        #[arg(long)]
        live: bool,

        /// Print the render payload as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for UnitSystem {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => UnitSystem::Metric,
            UnitsArg::Imperial => UnitSystem::Imperial,
        }
    }
}

fn parse_day(value: &str) -> Result<Weekday, String> {
    parse_weekday(value).ok_or_else(|| format!("unknown weekday '{value}'"))
}

struct ShowOptions {
    query: Option<LocationQuery>,
    units: Option<UnitSystem>,
    day: Option<Weekday>,
    live: bool,
    json: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, units, day, live, json } => {
                let query = match (city, lat, lon) {
                    (Some(city), _, _) => Some(LocationQuery::City(city)),
                    (None, Some(lat), Some(lon)) => Some(LocationQuery::Coordinates { lat, lon }),
                    _ => None,
                };
                let options = ShowOptions { query, units: units.map(Into::into), day, live, json };
                show(options).await
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    config.set_api_key(api_key);

    config.default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    let systems = vec![UnitSystem::Metric, UnitSystem::Imperial];
    let cursor = systems
        .iter()
        .position(|s| *s == config.units.fetch_system())
        .unwrap_or(0);
    let system = Select::new("Units:", systems).with_starting_cursor(cursor).prompt()?;
    config.units = UnitPreferences::preset(system);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(options: ShowOptions) -> Result<()> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;

    let units = options.units.map_or(config.units, UnitPreferences::preset);
    // No geolocation source on the command line; fall back to the default city.
    let query = options
        .query
        .unwrap_or_else(|| LocationQuery::initial(None, &config.default_city));

    let mut session = WeatherSession::new(provider, units);
    // A missing forecast is logged by the session; current conditions still render.
    if let Err(err) = session.refresh(query).await {
        let notice = err.user_message();
        return Err(anyhow::Error::new(err).context(notice));
    }

    if let Some(day) = options.day {
        session.select_day(day);
    }

    let payload = session.render_now().context("No weather data loaded")?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", output::Dashboard(&payload));
    }

    if options.live {
        follow_live_clock(&mut session).await?;
    }

    Ok(())
}

async fn follow_live_clock(session: &mut WeatherSession) -> Result<()> {
    let Some(mut ticks) = session.start_live_clock() else {
        return Ok(());
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = io::stdout();
    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let label = ticks.borrow_and_update().clone();
                write!(stdout, "\r{label}")?;
                stdout.flush()?;
            }
            _ = &mut ctrl_c => {
                writeln!(stdout)?;
                break;
            }
        }
    }

    Ok(())
}
