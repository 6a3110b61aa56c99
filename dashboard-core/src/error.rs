use chrono::Weekday;
use thiserror::Error;

use crate::{clock::weekday_name, location::LocationQuery};

/// Failures surfaced by a dashboard refresh or render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// The provider rejected the current-conditions query.
    #[error("location '{query}' not found: {reason}")]
    LocationNotFound { query: LocationQuery, reason: String },

    /// Current conditions loaded but the forecast query failed.
    #[error("forecast unavailable: {0}")]
    ForecastUnavailable(String),

    /// The selected weekday has no samples in the current horizon.
    #[error("no forecast data for {}", weekday_label(.0))]
    NoDataForDay(Weekday),

    /// The provider reported a UTC offset outside ±16 hours.
    #[error("invalid UTC offset: {0}s")]
    InvalidOffset(i64),
}

impl DashboardError {
    /// Notice text for the user. Only `LocationNotFound` and `InvalidOffset`
    /// abort a refresh; the rest degrade quietly.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::LocationNotFound { query: LocationQuery::Coordinates { .. }, .. } => {
                "Could not fetch weather for your location."
            }
            DashboardError::LocationNotFound { query: LocationQuery::City(_), .. } => {
                "Could not fetch weather. Try another city."
            }
            DashboardError::ForecastUnavailable(_) => "Forecast is temporarily unavailable.",
            DashboardError::NoDataForDay(_) => "No hourly data for the selected day.",
            DashboardError::InvalidOffset(_) => "The weather service returned an invalid time zone.",
        }
    }
}

fn weekday_label(day: &Weekday) -> &'static str {
    weekday_name(*day)
}
