use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::{
    clock::{CityClock, weekday_short},
    forecast::index::{DayBucket, ForecastIndex},
    model::ForecastSample,
};

/// One row of the day strip.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyRow {
    /// A horizon day summarized from its samples.
    Forecast {
        date: NaiveDate,
        weekday: Weekday,
        min: i64,
        max: i64,
        icon_code: String,
    },
    /// A horizon day with no samples; every field renders blank.
    Cleared { date: NaiveDate },
    /// A day past the data horizon. Only the weekday label is known.
    Extended { weekday: Weekday },
}

impl DailyRow {
    pub fn label(&self) -> &'static str {
        match self {
            DailyRow::Forecast { weekday, .. } | DailyRow::Extended { weekday } => {
                weekday_short(*weekday)
            }
            DailyRow::Cleared { .. } => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySummary {
    pub rows: Vec<DailyRow>,
}

/// Builds the day strip: `forecast_days` summarized days starting after
/// today, followed by `extended_days` label-only days continuing the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySummaryBuilder {
    pub forecast_days: usize,
    pub extended_days: usize,
}

impl Default for DailySummaryBuilder {
    fn default() -> Self {
        Self { forecast_days: 4, extended_days: 3 }
    }
}

impl DailySummaryBuilder {
    pub fn from_samples(
        &self,
        samples: &[ForecastSample],
        clock: CityClock,
        today: NaiveDate,
    ) -> DailySummary {
        self.build(&ForecastIndex::build(samples, clock), today)
    }

    pub fn build(&self, index: &ForecastIndex, today: NaiveDate) -> DailySummary {
        let first_day = index
            .horizon_keys(today)
            .first()
            .copied()
            .or_else(|| today.checked_add_days(Days::new(1)))
            .unwrap_or(today);

        let mut rows = Vec::with_capacity(self.forecast_days + self.extended_days);
        let mut last_weekday = first_day.weekday().pred();

        for offset in 0..self.forecast_days {
            let Some(date) = first_day.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            last_weekday = date.weekday();
            rows.push(match index.bucket(date) {
                Some(bucket) if !bucket.items.is_empty() => summarize(bucket),
                _ => DailyRow::Cleared { date },
            });
        }

        let mut weekday = last_weekday;
        for _ in 0..self.extended_days {
            weekday = weekday.succ();
            rows.push(DailyRow::Extended { weekday });
        }

        DailySummary { rows }
    }
}

fn summarize(bucket: &DayBucket) -> DailyRow {
    let (min, max) = bucket
        .items
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.temperature), hi.max(s.temperature))
        });

    DailyRow::Forecast {
        date: bucket.date,
        weekday: bucket.weekday(),
        min: min.round() as i64,
        max: max.round() as i64,
        icon_code: majority_icon(&bucket.items).unwrap_or_default(),
    }
}

/// Most frequent icon; on equal counts the one seen first wins.
pub fn majority_icon(samples: &[ForecastSample]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sample in samples {
        match counts.iter_mut().find(|(icon, _)| *icon == sample.icon_code) {
            Some((_, count)) => *count += 1,
            None => counts.push((sample.icon_code.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (icon, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((icon, count));
        }
    }
    best.map(|(icon, _)| icon.to_string())
}
