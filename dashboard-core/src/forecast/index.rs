use std::collections::BTreeMap;

use chrono::{NaiveDate, Weekday};

use crate::{
    clock::{CityClock, LocalFields},
    model::ForecastSample,
};

/// Samples sharing one city-local calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Local fields of the first sample placed in the bucket; used for labels.
    pub local_date: LocalFields,
    /// Time-ascending.
    pub items: Vec<ForecastSample>,
}

impl DayBucket {
    pub fn weekday(&self) -> Weekday {
        self.local_date.weekday()
    }
}

/// Day buckets for one forecast fetch. Rebuilt from scratch on every fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastIndex {
    clock: CityClock,
    buckets: BTreeMap<NaiveDate, DayBucket>,
}

impl ForecastIndex {
    pub fn build(samples: &[ForecastSample], clock: CityClock) -> Self {
        let mut ordered = samples.to_vec();
        // Stable sort keeps delivery order for equal timestamps.
        ordered.sort_by_key(|s| s.epoch_seconds);

        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        for sample in ordered {
            let local = clock.local_fields(sample.epoch_seconds);
            buckets
                .entry(local.date())
                .or_insert_with(|| DayBucket {
                    date: local.date(),
                    local_date: local,
                    items: Vec::new(),
                })
                .items
                .push(sample);
        }

        Self { clock, buckets }
    }

    pub fn clock(&self) -> CityClock {
        self.clock
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.buckets.get(&date)
    }

    /// Buckets in calendar order.
    pub fn buckets(&self) -> impl Iterator<Item = &DayBucket> {
        self.buckets.values()
    }

    /// Every sample whose bucket falls on `weekday`, time-ascending. Empty when
    /// the horizon has no such day.
    pub fn by_weekday(&self, weekday: Weekday) -> Vec<ForecastSample> {
        let mut matches: Vec<ForecastSample> = self
            .buckets
            .values()
            .filter(|bucket| bucket.weekday() == weekday)
            .flat_map(|bucket| bucket.items.iter().cloned())
            .collect();
        matches.sort_by_key(|s| s.epoch_seconds);
        matches
    }

    /// Bucket dates starting the day after `today` when today is present,
    /// otherwise from the earliest bucket.
    pub fn horizon_keys(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let keys: Vec<NaiveDate> = self.buckets.keys().copied().collect();
        let start = keys.iter().position(|d| *d == today).map_or(0, |i| i + 1);
        keys[start..].to_vec()
    }
}
