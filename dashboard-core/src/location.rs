use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Coordinates;

static ADMIN_PREFIXES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    ["State of", "Province of", "County of", "Region of"].map(|prefix| {
        Regex::new(&format!(r"(?i){prefix}\s*")).expect("valid admin prefix pattern")
    })
});

/// What the user asked for: a city name or a coordinate pair, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Prefer a one-shot geolocation fix, fall back to the configured city.
    pub fn initial(geolocation: Option<Coordinates>, default_city: &str) -> Self {
        match geolocation {
            Some(Coordinates { lat, lon }) => LocationQuery::Coordinates { lat, lon },
            None => LocationQuery::City(default_city.to_string()),
        }
    }

    /// Query parameters understood by the provider.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

/// Strips administrative-division prefixes such as "State of".
pub fn clean_city_name(city: &str) -> String {
    let mut cleaned = city.to_string();
    for pattern in ADMIN_PREFIXES.iter() {
        cleaned = pattern.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

pub fn location_label(city: &str, country_code: Option<&str>) -> String {
    let city = clean_city_name(city);
    match country_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(country) => format!("{city}, {country}"),
        None => city,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_admin_prefixes_case_insensitively() {
        assert_eq!(clean_city_name("State of Lagos"), "Lagos");
        assert_eq!(clean_city_name("province of  Ontario "), "Ontario");
        assert_eq!(clean_city_name("County of Kerry"), "Kerry");
        assert_eq!(clean_city_name("REGION OF Murcia"), "Murcia");
        assert_eq!(clean_city_name("Berlin"), "Berlin");
    }

    #[test]
    fn label_includes_country_when_known() {
        assert_eq!(location_label("State of Lagos", Some("NG")), "Lagos, NG");
        assert_eq!(location_label("Nowhere", None), "Nowhere");
        assert_eq!(location_label("Nowhere", Some(" ")), "Nowhere");
    }

    #[test]
    fn initial_location_prefers_geolocation() {
        let geo = Coordinates { lat: 52.52, lon: 13.4 };
        assert_eq!(
            LocationQuery::initial(Some(geo), "Lagos"),
            LocationQuery::Coordinates { lat: 52.52, lon: 13.4 }
        );
        assert_eq!(LocationQuery::initial(None, "Lagos"), LocationQuery::City("Lagos".into()));
    }

    #[test]
    fn query_params_by_kind() {
        let city = LocationQuery::City("Paris".into());
        assert_eq!(city.query_params(), vec![("q", "Paris".to_string())]);

        let coords = LocationQuery::Coordinates { lat: 1.5, lon: -2.25 };
        assert_eq!(
            coords.query_params(),
            vec![("lat", "1.5".to_string()), ("lon", "-2.25".to_string())]
        );
        assert_eq!(coords.to_string(), "1.5000, -2.2500");
    }
}
