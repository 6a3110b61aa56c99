//! Session orchestration: owns the state, talks to the provider, and keeps
//! only the newest response when refreshes overlap.

use std::sync::Arc;

use chrono::{Utc, Weekday};
use tokio::sync::watch;

use crate::{
    clock::CityClock,
    error::DashboardError,
    forecast::index::ForecastIndex,
    live_clock::LiveClock,
    location::LocationQuery,
    model::{CurrentConditions, ForecastPayload},
    provider::WeatherProvider,
    render::{RenderPayload, build_render_payload},
    units::{UnitPreferences, UnitSystem},
};

/// Everything the dashboard knows between refreshes.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub location: Option<LocationQuery>,
    pub units: UnitPreferences,
    pub selected_day: Option<Weekday>,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<ForecastPayload>,
    /// Unit system the stored payloads were fetched in.
    pub fetched_in: UnitSystem,
    pub clock: CityClock,
    /// Rebuilt from `forecast` on every load, never patched.
    pub index: ForecastIndex,
}

impl SessionState {
    pub fn new(units: UnitPreferences) -> Self {
        Self { units, ..Self::default() }
    }

    /// State after a successful load. The forecast (when present) is bucketed
    /// with `clock`.
    pub fn loaded(
        location: LocationQuery,
        units: UnitPreferences,
        fetched_in: UnitSystem,
        current: CurrentConditions,
        forecast: Option<ForecastPayload>,
        clock: CityClock,
    ) -> Self {
        let index = forecast
            .as_ref()
            .map(|f| ForecastIndex::build(&f.samples, clock))
            .unwrap_or_default();

        Self {
            location: Some(location),
            units,
            selected_day: None,
            current: Some(current),
            forecast,
            fetched_in,
            clock,
            index,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}

/// A refresh stamped with the generation that was current when it started.
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    generation: u64,
    query: LocationQuery,
    system: UnitSystem,
}

impl RefreshRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &LocationQuery {
        &self.query
    }

    /// Current conditions first, then the forecast. The forecast is skipped
    /// when the location lookup already failed.
    pub async fn execute(self, provider: &dyn WeatherProvider) -> RefreshOutcome {
        let current = provider.current(&self.query, self.system).await;
        let forecast = match current {
            Ok(_) => Some(provider.forecast(&self.query, self.system).await),
            Err(_) => None,
        };

        RefreshOutcome { request: self, current, forecast }
    }
}

#[derive(Debug)]
pub struct RefreshOutcome {
    request: RefreshRequest,
    current: anyhow::Result<CurrentConditions>,
    forecast: Option<anyhow::Result<ForecastPayload>>,
}

impl RefreshOutcome {
    pub fn generation(&self) -> u64 {
        self.request.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshStatus {
    /// State replaced. `forecast_error` is set when only current conditions
    /// loaded.
    Applied { forecast_error: Option<DashboardError> },
    /// A newer refresh was started after this one; the response was dropped.
    Stale,
    /// Nothing to refresh yet.
    NoLocation,
}

#[derive(Debug)]
pub struct WeatherSession {
    provider: Arc<dyn WeatherProvider>,
    state: SessionState,
    generation: u64,
    live_clock: Option<LiveClock>,
}

impl WeatherSession {
    pub fn new(provider: Arc<dyn WeatherProvider>, units: UnitPreferences) -> Self {
        Self {
            provider,
            state: SessionState::new(units),
            generation: 0,
            live_clock: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.provider)
    }

    /// Starts a refresh and invalidates every one started before it.
    pub fn begin_refresh(&mut self, query: LocationQuery) -> RefreshRequest {
        self.generation += 1;
        RefreshRequest {
            generation: self.generation,
            query,
            system: self.state.units.fetch_system(),
        }
    }

    /// Applies a finished refresh unless a newer one has been started.
    ///
    /// `LocationNotFound` and `InvalidOffset` leave the previous state intact.
    /// A failed forecast still loads current conditions and is reported in
    /// the returned status.
    pub fn apply(&mut self, outcome: RefreshOutcome) -> Result<RefreshStatus, DashboardError> {
        let RefreshOutcome { request, current, forecast } = outcome;

        if request.generation != self.generation {
            tracing::debug!(
                stale = request.generation,
                latest = self.generation,
                "discarding superseded refresh"
            );
            return Ok(RefreshStatus::Stale);
        }

        let current = current.map_err(|err| DashboardError::LocationNotFound {
            query: request.query.clone(),
            reason: format!("{err:#}"),
        })?;

        let (forecast, forecast_error) = match forecast {
            Some(Ok(payload)) => (Some(payload), None),
            Some(Err(err)) => {
                let err = DashboardError::ForecastUnavailable(format!("{err:#}"));
                tracing::warn!(location = %request.query, "{err}");
                (None, Some(err))
            }
            None => (None, Some(DashboardError::ForecastUnavailable("not requested".into()))),
        };

        let offset = forecast
            .as_ref()
            .map_or(current.utc_offset_seconds, |f| f.utc_offset_seconds);
        let clock = CityClock::new(offset)?;
        let location = request.query.to_string();

        let mut state = SessionState::loaded(
            request.query,
            self.state.units,
            request.system,
            current,
            forecast,
            clock,
        );
        state.selected_day = Some(clock.now().weekday());
        self.state = state;

        // A running ticker must follow the newly loaded city.
        if self.live_clock.as_ref().is_some_and(|live| live.clock() != clock) {
            self.start_live_clock();
        }

        tracing::info!(
            %location,
            offset,
            days = self.state.index.len(),
            "weather refreshed"
        );

        Ok(RefreshStatus::Applied { forecast_error })
    }

    pub async fn refresh(&mut self, query: LocationQuery) -> Result<RefreshStatus, DashboardError> {
        let request = self.begin_refresh(query);
        let outcome = request.execute(self.provider.as_ref()).await;
        self.apply(outcome)
    }

    /// Re-queries the stored location, e.g. after a unit change.
    pub async fn refresh_current(&mut self) -> Result<RefreshStatus, DashboardError> {
        match self.state.location.clone() {
            Some(query) => self.refresh(query).await,
            None => Ok(RefreshStatus::NoLocation),
        }
    }

    pub async fn set_units(
        &mut self,
        units: UnitPreferences,
    ) -> Result<RefreshStatus, DashboardError> {
        self.state.units = units;
        self.refresh_current().await
    }

    /// Switches every unit between the metric and imperial presets.
    pub async fn toggle_unit_system(&mut self) -> Result<RefreshStatus, DashboardError> {
        self.set_units(self.state.units.toggle_system()).await
    }

    pub fn select_day(&mut self, day: Weekday) {
        self.state.selected_day = Some(day);
    }

    pub fn render(&self, now_epoch: i64) -> Option<RenderPayload> {
        build_render_payload(&self.state, now_epoch)
    }

    pub fn render_now(&self) -> Option<RenderPayload> {
        self.render(Utc::now().timestamp())
    }

    /// Starts the ticking clock label for the loaded city, replacing any
    /// previous one. Requires a tokio runtime.
    pub fn start_live_clock(&mut self) -> Option<watch::Receiver<String>> {
        if !self.state.is_loaded() {
            return None;
        }
        let live = LiveClock::start(self.state.clock);
        let receiver = live.subscribe();
        self.live_clock = Some(live);
        Some(receiver)
    }

    pub fn live_clock(&self) -> Option<&LiveClock> {
        self.live_clock.as_ref()
    }
}
