use serde::{Deserialize, Serialize};

const MPS_TO_KMH: f64 = 3.6;
const MPH_TO_KMH: f64 = 1.609_344;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Kmh,
    Mph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    In,
}

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnitPreferences {
    #[serde(default)]
    pub temperature: TemperatureUnit,
    #[serde(default)]
    pub wind: WindUnit,
    #[serde(default)]
    pub precipitation: PrecipitationUnit,
}

impl UnitPreferences {
    pub fn preset(system: UnitSystem) -> Self {
        match system {
            UnitSystem::Metric => Self::default(),
            UnitSystem::Imperial => Self {
                temperature: TemperatureUnit::Fahrenheit,
                wind: WindUnit::Mph,
                precipitation: PrecipitationUnit::In,
            },
        }
    }

    /// The provider returns temperatures in the fetch system, so the
    /// temperature preference decides it.
    pub fn fetch_system(&self) -> UnitSystem {
        match self.temperature {
            TemperatureUnit::Celsius => UnitSystem::Metric,
            TemperatureUnit::Fahrenheit => UnitSystem::Imperial,
        }
    }

    /// Flip every preference to the other preset, keyed off temperature.
    pub fn toggle_system(&self) -> Self {
        match self.temperature {
            TemperatureUnit::Fahrenheit => Self::preset(UnitSystem::Metric),
            TemperatureUnit::Celsius => Self::preset(UnitSystem::Imperial),
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self.temperature {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self.wind {
            WindUnit::Kmh => "km/h",
            WindUnit::Mph => "mph",
        }
    }

    pub fn precipitation_suffix(&self) -> &'static str {
        match self.precipitation {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::In => "in",
        }
    }

    /// Converts a provider wind speed (m/s for metric, mph for imperial).
    pub fn wind_speed(&self, raw: f64, fetched_in: UnitSystem) -> f64 {
        let kmh = match fetched_in {
            UnitSystem::Metric => raw * MPS_TO_KMH,
            UnitSystem::Imperial => raw * MPH_TO_KMH,
        };
        match self.wind {
            WindUnit::Kmh => kmh,
            WindUnit::Mph => kmh / MPH_TO_KMH,
        }
    }

    pub fn precipitation(&self, millimetres: f64) -> f64 {
        match self.precipitation {
            PrecipitationUnit::Mm => millimetres,
            PrecipitationUnit::In => millimetres / MM_PER_INCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_switches_all_three_preferences() {
        let metric = UnitPreferences::default();
        let imperial = metric.toggle_system();

        assert_eq!(imperial, UnitPreferences::preset(UnitSystem::Imperial));
        assert_eq!(imperial.toggle_system(), metric);
        assert_eq!(imperial.fetch_system(), UnitSystem::Imperial);
    }

    #[test]
    fn suffixes_follow_each_preference_independently() {
        let prefs = UnitPreferences {
            temperature: TemperatureUnit::Celsius,
            wind: WindUnit::Mph,
            precipitation: PrecipitationUnit::Mm,
        };
        assert_eq!(prefs.temperature_suffix(), "°C");
        assert_eq!(prefs.wind_suffix(), "mph");
        assert_eq!(prefs.precipitation_suffix(), "mm");
    }

    #[test]
    fn wind_conversion() {
        let kmh = UnitPreferences::default();
        assert!((kmh.wind_speed(10.0, UnitSystem::Metric) - 36.0).abs() < 1e-9);

        let mph = UnitPreferences::preset(UnitSystem::Imperial);
        assert!((mph.wind_speed(12.0, UnitSystem::Imperial) - 12.0).abs() < 1e-9);
        assert!((kmh.wind_speed(1.0, UnitSystem::Imperial) - MPH_TO_KMH).abs() < 1e-9);
    }

    #[test]
    fn precipitation_conversion() {
        let inches = UnitPreferences::preset(UnitSystem::Imperial);
        assert!((inches.precipitation(25.4) - 1.0).abs() < 1e-9);
        assert_eq!(UnitPreferences::default().precipitation(3.2), 3.2);
    }

    #[test]
    fn unit_system_parsing() {
        assert_eq!(UnitSystem::try_from("Imperial").unwrap(), UnitSystem::Imperial);
        assert!(UnitSystem::try_from("kelvin").unwrap_err().to_string().contains("Unknown unit system"));
    }

    #[test]
    fn preferences_deserialize_from_lowercase_toml() {
        let prefs: UnitPreferences =
            toml::from_str("temperature = \"fahrenheit\"\nwind = \"kmh\"\nprecipitation = \"in\"").unwrap();
        assert_eq!(prefs.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(prefs.wind, WindUnit::Kmh);
        assert_eq!(prefs.precipitation, PrecipitationUnit::In);
    }
}
