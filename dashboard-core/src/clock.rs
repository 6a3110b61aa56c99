//! City-local time arithmetic.
//!
//! The UTC offset is folded into the timestamp once and the result is read
//! with the UTC calendar, so nothing here depends on the host's time zone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};

use crate::error::DashboardError;

/// Largest accepted distance from UTC, in seconds.
pub const MAX_OFFSET_SECONDS: i64 = 16 * 3600;

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Weekdays in index order, 0 = Sunday.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// A city's fixed UTC offset for the duration of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CityClock {
    utc_offset_seconds: i64,
}

impl CityClock {
    pub const UTC: CityClock = CityClock { utc_offset_seconds: 0 };

    pub fn new(utc_offset_seconds: i64) -> Result<Self, DashboardError> {
        if utc_offset_seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(DashboardError::InvalidOffset(utc_offset_seconds));
        }
        Ok(Self { utc_offset_seconds })
    }

    pub fn utc_offset_seconds(&self) -> i64 {
        self.utc_offset_seconds
    }

    /// Local calendar fields of a UTC epoch timestamp.
    pub fn local_fields(&self, epoch_seconds: i64) -> LocalFields {
        LocalFields::from_local_epoch(epoch_seconds.saturating_add(self.utc_offset_seconds))
    }

    /// Inverse of [`CityClock::local_fields`]: the UTC epoch for a local instant.
    pub fn to_epoch(&self, local_epoch: i64) -> i64 {
        local_epoch - self.utc_offset_seconds
    }

    /// Local fields for the live wall clock. Never cached; each call reads the
    /// system time again.
    pub fn now(&self) -> LocalFields {
        self.local_fields(Utc::now().timestamp())
    }
}

/// Calendar components of an instant as perceived in the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalFields {
    local_epoch: i64,
    datetime: NaiveDateTime,
}

impl LocalFields {
    /// `local_epoch` is a UTC epoch with the city offset already added.
    pub fn from_local_epoch(local_epoch: i64) -> Self {
        let min = DateTime::<Utc>::MIN_UTC.timestamp();
        let max = DateTime::<Utc>::MAX_UTC.timestamp();
        let clamped = local_epoch.clamp(min, max);
        let datetime = DateTime::from_timestamp(clamped, 0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
            .naive_utc();

        Self { local_epoch: clamped, datetime }
    }

    pub fn local_epoch(&self) -> i64 {
        self.local_epoch
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn weekday(&self) -> Weekday {
        self.datetime.weekday()
    }

    /// 0 = Sunday .. 6 = Saturday.
    pub fn weekday_index(&self) -> u32 {
        self.weekday().num_days_from_sunday()
    }

    pub fn hour(&self) -> u32 {
        self.datetime.hour()
    }

    /// ISO `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        date_key(self.date())
    }

    /// Same instant with minutes and seconds dropped.
    pub fn truncate_to_hour(&self) -> LocalFields {
        LocalFields::from_local_epoch(
            self.local_epoch - self.local_epoch.rem_euclid(SECONDS_PER_HOUR),
        )
    }

    pub fn plus_hours(&self, hours: i64) -> LocalFields {
        LocalFields::from_local_epoch(
            self.local_epoch.saturating_add(hours.saturating_mul(SECONDS_PER_HOUR)),
        )
    }

    /// 12-hour label such as `3 PM`.
    pub fn hour_label(&self) -> String {
        self.datetime.format("%-I %p").to_string()
    }

    /// Long form used by the live clock, e.g. `Sun, Oct 18, 2026, 02:05:09 PM`.
    pub fn clock_label(&self) -> String {
        self.datetime.format("%a, %b %-d, %Y, %I:%M:%S %p").to_string()
    }
}

pub fn local_fields(epoch_seconds: i64, utc_offset_seconds: i64) -> Result<LocalFields, DashboardError> {
    Ok(CityClock::new(utc_offset_seconds)?.local_fields(epoch_seconds))
}

pub fn city_now(utc_offset_seconds: i64) -> Result<LocalFields, DashboardError> {
    Ok(CityClock::new(utc_offset_seconds)?.now())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Three-letter abbreviation, e.g. `Wed`.
pub fn weekday_short(day: Weekday) -> &'static str {
    &weekday_name(day)[..3]
}

/// Accepts full or abbreviated names in any case.
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}

/// The seven weekdays starting at `first`.
pub fn week_from(first: Weekday) -> Vec<Weekday> {
    let start = first.num_days_from_sunday() as usize;
    (0..7).map(|i| WEEKDAYS[(start + i) % 7]).collect()
}
