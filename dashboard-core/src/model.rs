use serde::{Deserialize, Serialize};

/// One 3-hourly forecast data point as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// UTC epoch seconds.
    pub epoch_seconds: i64,
    /// In the unit system that was active when the forecast was fetched.
    pub temperature: f64,
    pub icon_code: String,
    pub description: String,
}

impl ForecastSample {
    pub fn new(epoch_seconds: i64, temperature: f64, icon_code: impl Into<String>) -> Self {
        Self {
            epoch_seconds,
            temperature,
            icon_code: icon_code.into(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current-conditions block, in the fetch unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    pub country_code: Option<String>,
    pub coordinates: Coordinates,
    pub utc_offset_seconds: i64,
    pub observed_at: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    /// m/s for metric fetches, mph for imperial.
    pub wind_speed: f64,
    /// Rain over the last hour in millimetres; zero when not reported.
    pub precipitation_mm: f64,
    pub icon_code: String,
    pub description: String,
}

/// Raw forecast feed plus the city metadata needed to bucket it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub city_name: String,
    pub country_code: Option<String>,
    pub utc_offset_seconds: i64,
    pub horizon_days: u32,
    pub samples: Vec<ForecastSample>,
}
