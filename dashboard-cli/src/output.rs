use std::fmt;

use dashboard_core::RenderPayload;

/// Plain-text rendering of the dashboard.
pub struct Dashboard<'a>(pub &'a RenderPayload);

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = self.0;
        let current = &payload.current;

        writeln!(f, "{}", payload.location_label)?;
        writeln!(f, "{}", payload.local_time)?;
        writeln!(f)?;
        writeln!(f, "  {}  {}", current.temperature, current.description)?;
        writeln!(
            f,
            "  Feels like {}   Humidity {}   Wind {}   Precipitation {}",
            current.feels_like, current.humidity, current.wind, current.precipitation
        )?;
        writeln!(f)?;

        if !payload.forecast_available {
            return writeln!(f, "Forecast unavailable.");
        }

        writeln!(f, "Daily")?;
        for row in &payload.daily {
            writeln!(
                f,
                "  {:<4} {:>5} {:>5}  {}",
                row.label,
                row.min,
                row.max,
                row.icon_code.as_deref().unwrap_or("")
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Hourly ({})", payload.selected_day)?;
        if !payload.hourly_available {
            return writeln!(f, "  No hourly data for {}.", payload.selected_day);
        }

        for slot in payload.hourly.iter().filter(|slot| !slot.hidden) {
            let marker = if slot.current { "  <- now" } else { "" };
            writeln!(
                f,
                "  {:>5}  {:>8}  {}{}",
                slot.label,
                slot.temperature,
                slot.icon_code.as_deref().unwrap_or(""),
                marker
            )?;
        }

        Ok(())
    }
}
