//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - City-local time arithmetic from a fixed UTC offset
//! - Indexing of the 3-hourly forecast feed into daily summaries and an hourly timeline
//! - The OpenWeather provider and configuration handling
//! - A session that refreshes, guards against stale responses and builds render payloads
//!
//! It is used by `dashboard-cli`, but any front end can drive a [`WeatherSession`]
//! and draw the [`RenderPayload`] it produces.

pub mod clock;
pub mod config;
pub mod error;
pub mod forecast;
pub mod live_clock;
pub mod location;
pub mod model;
pub mod provider;
pub mod render;
pub mod session;
pub mod units;

pub use clock::{CityClock, LocalFields};
pub use config::Config;
pub use error::DashboardError;
pub use forecast::{
    DailyRow, DailySummary, DailySummaryBuilder, ForecastIndex, HourlySlot, HourlyTimeline,
};
pub use live_clock::LiveClock;
pub use location::LocationQuery;
pub use model::{Coordinates, CurrentConditions, ForecastPayload, ForecastSample};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use render::{RenderPayload, build_render_payload};
pub use session::{RefreshStatus, SessionState, WeatherSession};
pub use units::{UnitPreferences, UnitSystem};
