use crate::{
    Config,
    location::LocationQuery,
    model::{CurrentConditions, ForecastPayload},
    provider::openweather::OpenWeatherProvider,
    units::UnitSystem,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of current conditions and the 3-hourly forecast feed.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        query: &LocationQuery,
        system: UnitSystem,
    ) -> anyhow::Result<CurrentConditions>;

    async fn forecast(
        &self,
        query: &LocationQuery,
        system: UnitSystem,
    ) -> anyhow::Result<ForecastPayload>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = match &config.base_url {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key, base_url.clone())?,
        None => OpenWeatherProvider::new(api_key)?,
    };

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_works_when_key_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn provider_from_config_honours_base_url() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.base_url = Some("http://127.0.0.1:9".to_string());

        let provider = provider_from_config(&cfg).expect("provider builds");
        assert!(format!("{provider:?}").contains("127.0.0.1:9"));
    }
}
