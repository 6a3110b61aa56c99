//! Pure computation of what the renderer shows. Nothing here touches a
//! display surface; adapters format or draw a [`RenderPayload`].

use std::borrow::Cow;

use serde::Serialize;

use crate::{
    clock::{week_from, weekday_name},
    forecast::{DailyRow, DailySummaryBuilder, HourlyTimeline, TimelineStatus},
    forecast::index::ForecastIndex,
    location::location_label,
    model::ForecastSample,
    session::SessionState,
    units::{TemperatureUnit, UnitPreferences, UnitSystem},
};

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_URL_BASE}/{icon_code}@2x.png")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentMetricsView {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub precipitation: String,
    pub icon_code: String,
    pub icon_url: String,
    pub description: String,
}

/// Blank fields mean "cleared" or "no data past the horizon".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRowView {
    pub label: String,
    pub min: String,
    pub max: String,
    pub icon_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySlotView {
    pub label: String,
    pub temperature: String,
    pub icon_code: Option<String>,
    pub hidden: bool,
    /// Slot nearest to the city's current hour.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPayload {
    pub location_label: String,
    pub local_time: String,
    pub current: CurrentMetricsView,
    pub daily: Vec<DailyRowView>,
    pub selected_day: String,
    /// Seven weekday names starting at the city's current weekday.
    pub day_options: Vec<String>,
    pub hourly: Vec<HourlySlotView>,
    pub hourly_available: bool,
    pub forecast_available: bool,
}

/// `None` until the session has loaded a location.
pub fn build_render_payload(state: &SessionState, now_epoch: i64) -> Option<RenderPayload> {
    let current = state.current.as_ref()?;
    let units = state.units;
    let fetched_in = state.fetched_in;
    let clock = state.clock;
    let now = clock.local_fields(now_epoch);

    let index = converted_index(&state.index, units, fetched_in);
    let selected_day = state.selected_day.unwrap_or_else(|| now.weekday());

    let daily = DailySummaryBuilder::default()
        .build(&index, now.date())
        .rows
        .iter()
        .map(daily_row_view)
        .collect();

    let day_samples = index.by_weekday(selected_day);
    let timeline = HourlyTimeline::build(selected_day, &day_samples, clock, now);
    let current_slot = timeline.current_slot(now);
    let hourly = timeline
        .slots
        .iter()
        .map(|slot| HourlySlotView {
            label: slot.label.clone(),
            temperature: slot
                .temperature
                .map(|t| format!("{t:.1}{}", units.temperature_suffix()))
                .unwrap_or_default(),
            icon_code: slot.icon_code.clone(),
            hidden: slot.is_hidden(),
            current: Some(slot.index) == current_slot,
        })
        .collect();

    let temperature = |raw: f64| convert_temperature(raw, fetched_in, units.temperature);
    let current_view = CurrentMetricsView {
        temperature: format!("{}°", whole(temperature(current.temperature))),
        feels_like: format!("{}°", whole(temperature(current.feels_like))),
        humidity: format!("{}%", current.humidity_pct),
        wind: format!(
            "{} {}",
            whole(units.wind_speed(current.wind_speed, fetched_in)),
            units.wind_suffix()
        ),
        precipitation: format!(
            "{} {}",
            units.precipitation(current.precipitation_mm).ceil() as i64,
            units.precipitation_suffix()
        ),
        icon_code: current.icon_code.clone(),
        icon_url: icon_url(&current.icon_code),
        description: current.description.clone(),
    };

    Some(RenderPayload {
        location_label: location_label(&current.city_name, current.country_code.as_deref()),
        local_time: now.clock_label(),
        current: current_view,
        daily,
        selected_day: weekday_name(selected_day).to_string(),
        day_options: week_from(now.weekday())
            .into_iter()
            .map(|day| weekday_name(day).to_string())
            .collect(),
        hourly,
        hourly_available: timeline.status == TimelineStatus::Ready,
        forecast_available: state.forecast.is_some(),
    })
}

fn daily_row_view(row: &DailyRow) -> DailyRowView {
    match row {
        DailyRow::Forecast { min, max, icon_code, .. } => DailyRowView {
            label: row.label().to_string(),
            min: format!("{min}°"),
            max: format!("{max}°"),
            icon_code: Some(icon_code.clone()),
        },
        DailyRow::Cleared { .. } | DailyRow::Extended { .. } => DailyRowView {
            label: row.label().to_string(),
            min: String::new(),
            max: String::new(),
            icon_code: None,
        },
    }
}

/// Temperatures are stored in the fetch system; re-express them when the
/// preference changed without a successful refetch.
fn converted_index(
    index: &ForecastIndex,
    units: UnitPreferences,
    fetched_in: UnitSystem,
) -> Cow<'_, ForecastIndex> {
    if units.fetch_system() == fetched_in {
        return Cow::Borrowed(index);
    }

    let samples: Vec<ForecastSample> = index
        .buckets()
        .flat_map(|bucket| bucket.items.iter())
        .map(|sample| ForecastSample {
            temperature: convert_temperature(sample.temperature, fetched_in, units.temperature),
            ..sample.clone()
        })
        .collect();
    Cow::Owned(ForecastIndex::build(&samples, index.clock()))
}

fn whole(value: f64) -> i64 {
    value.round() as i64
}

pub fn convert_temperature(raw: f64, fetched_in: UnitSystem, target: TemperatureUnit) -> f64 {
    match (fetched_in, target) {
        (UnitSystem::Metric, TemperatureUnit::Fahrenheit) => raw * 9.0 / 5.0 + 32.0,
        (UnitSystem::Imperial, TemperatureUnit::Celsius) => (raw - 32.0) * 5.0 / 9.0,
        _ => raw,
    }
}
