//! 24-slot hourly timeline synthesized from the 3-hourly feed.
//!
//! Today's timeline starts at the city's current hour so it always shows the
//! upcoming hours; any other day starts at the hour of its first sample. Each
//! slot's temperature is linearly interpolated between the two samples that
//! bracket it, and its icon is taken from whichever of the two is nearer.
//! Slots outside the sampled range reuse the nearest extreme sample.

use chrono::Weekday;

use crate::{
    clock::{CityClock, LocalFields},
    error::DashboardError,
    model::ForecastSample,
};

pub const SLOT_COUNT: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct HourlySlot {
    pub index: usize,
    /// City-local hour the slot represents; `None` for hidden slots.
    pub local_time: Option<LocalFields>,
    pub label: String,
    /// Rounded to one decimal place.
    pub temperature: Option<f64>,
    pub icon_code: Option<String>,
}

impl HourlySlot {
    fn hidden(index: usize) -> Self {
        Self {
            index,
            local_time: None,
            label: String::new(),
            temperature: None,
            icon_code: None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.temperature.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineStatus {
    Ready,
    NoDataForDay(Weekday),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyTimeline {
    pub day: Weekday,
    pub status: TimelineStatus,
    pub slots: Vec<HourlySlot>,
}

impl HourlyTimeline {
    /// `day_samples` must be the selected day's samples, time-ascending.
    pub fn build(
        day: Weekday,
        day_samples: &[ForecastSample],
        clock: CityClock,
        now: LocalFields,
    ) -> Self {
        let Some(first) = day_samples.first() else {
            return Self::hidden(day);
        };

        let is_today = now.weekday() == day;
        let start = if is_today {
            now.truncate_to_hour()
        } else {
            clock.local_fields(first.epoch_seconds).truncate_to_hour()
        };

        let slots = (0..SLOT_COUNT)
            .map(|index| {
                let local = start.plus_hours(index as i64);
                let slot_epoch = clock.to_epoch(local.local_epoch());
                let (before, after) = bracket(day_samples, slot_epoch).unwrap_or((first, first));
                let (temperature, icon) = interpolate(before, after, slot_epoch);

                HourlySlot {
                    index,
                    local_time: Some(local),
                    label: local.hour_label(),
                    temperature: Some(temperature),
                    icon_code: Some(icon.to_string()),
                }
            })
            .collect();

        Self { day, status: TimelineStatus::Ready, slots }
    }

    fn hidden(day: Weekday) -> Self {
        Self {
            day,
            status: TimelineStatus::NoDataForDay(day),
            slots: (0..SLOT_COUNT).map(HourlySlot::hidden).collect(),
        }
    }

    pub fn no_data_error(&self) -> Option<DashboardError> {
        match self.status {
            TimelineStatus::Ready => None,
            TimelineStatus::NoDataForDay(day) => Some(DashboardError::NoDataForDay(day)),
        }
    }

    /// Index of the visible slot whose hour is closest to the current hour;
    /// the first one wins on ties.
    pub fn current_slot(&self, now: LocalFields) -> Option<usize> {
        let current = i64::from(now.hour());
        self.slots
            .iter()
            .filter_map(|slot| slot.local_time.map(|t| (slot.index, i64::from(t.hour()))))
            .min_by_key(|(_, hour)| (hour - current).abs())
            .map(|(index, _)| index)
    }
}

/// First adjacent pair with `before <= epoch <= after`. Outside the sampled
/// range both ends are the nearest extreme sample.
pub fn bracket(samples: &[ForecastSample], epoch: i64) -> Option<(&ForecastSample, &ForecastSample)> {
    let first = samples.first()?;
    let last = samples.last()?;

    if epoch <= first.epoch_seconds {
        return Some((first, first));
    }
    if epoch >= last.epoch_seconds {
        return Some((last, last));
    }

    samples
        .windows(2)
        .find(|pair| pair[0].epoch_seconds <= epoch && epoch <= pair[1].epoch_seconds)
        .map(|pair| (&pair[0], &pair[1]))
}

/// Temperature (one decimal) and icon for `epoch` between two samples.
pub fn interpolate<'a>(
    before: &'a ForecastSample,
    after: &'a ForecastSample,
    epoch: i64,
) -> (f64, &'a str) {
    let span = after.epoch_seconds - before.epoch_seconds;
    let ratio = if span == 0 {
        0.0
    } else {
        ((epoch - before.epoch_seconds) as f64 / span as f64).clamp(0.0, 1.0)
    };

    let temperature = before.temperature + (after.temperature - before.temperature) * ratio;
    let icon = if ratio < 0.5 { &before.icon_code } else { &after.icon_code };

    (round_tenth(temperature), icon)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
