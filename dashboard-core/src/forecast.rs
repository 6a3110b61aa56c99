//! Turning the 3-hourly feed into per-day and per-hour views.
//!
//! - [`index`] buckets samples by city-local calendar day
//! - [`hourly`] synthesizes the 24-slot hourly timeline
//! - [`daily`] builds the day summary rows

pub mod daily;
pub mod hourly;
pub mod index;

pub use daily::{DailyRow, DailySummary, DailySummaryBuilder};
pub use hourly::{HourlySlot, HourlyTimeline, SLOT_COUNT, TimelineStatus};
pub use index::{DayBucket, ForecastIndex};
