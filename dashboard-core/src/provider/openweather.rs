use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    location::LocationQuery,
    model::{Coordinates, CurrentConditions, ForecastPayload, ForecastSample},
    units::UnitSystem,
};

use super::WeatherProvider;

const BASE_URL: &str = "https://api.openweathermap.org";

/// Days covered by the free 3-hourly forecast endpoint.
const FORECAST_HORIZON_DAYS: u32 = 5;

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Requests use the HTTP client's default timeouts.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get(&self, endpoint: &str, query: &LocationQuery, system: UnitSystem) -> Result<String> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);

        let mut params = query.query_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", system.as_str().to_string()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwRain {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    rain: Option<OwRain>,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: Option<String>,
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (icon_code, description) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.icon, w.description))
            .unwrap_or_else(|| (String::new(), "Unknown".to_string()));

        CurrentConditions {
            city_name: parsed.name,
            country_code: parsed.sys.country,
            coordinates: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
            utc_offset_seconds: parsed.timezone,
            observed_at: parsed.dt,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            precipitation_mm: parsed.rain.unwrap_or_default().one_hour,
            icon_code,
            description,
        }
    }
}

impl From<OwForecastResponse> for ForecastPayload {
    fn from(parsed: OwForecastResponse) -> Self {
        let samples = parsed
            .list
            .into_iter()
            .filter_map(|entry| {
                let weather = entry.weather.into_iter().next()?;
                Some(ForecastSample {
                    epoch_seconds: entry.dt,
                    temperature: entry.main.temp,
                    icon_code: weather.icon,
                    description: weather.description,
                })
            })
            .collect();

        ForecastPayload {
            city_name: parsed.city.name,
            country_code: parsed.city.country,
            utc_offset_seconds: parsed.city.timezone,
            horizon_days: FORECAST_HORIZON_DAYS,
            samples,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery, system: UnitSystem) -> Result<CurrentConditions> {
        let body = self.get("weather", query, system).await?;
        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;
        Ok(parsed.into())
    }

    async fn forecast(&self, query: &LocationQuery, system: UnitSystem) -> Result<ForecastPayload> {
        let body = self.get("forecast", query, system).await?;
        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;
        Ok(parsed.into())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
