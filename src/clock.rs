//! Wall-clock access and the human-readable timestamp format.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone};

/// Format used for the `startTimestamp` / `endTimestamp` text, e.g.
/// `Mon Oct 19 09:05:00 2026`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Format used when parsing stored text back. Whitespace is collapsed first,
/// so single-digit days parse whether or not they were space padded.
const PARSE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock pinned to a given instant. Each call to [`FixedClock::advance`]
/// moves it forward.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// A clock at the given UTC wall time.
    ///
    /// # Panics
    ///
    /// Panics if the date or time is out of range.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let offset = FixedOffset::east_opt(0).expect("zero offset is valid");
        let now = offset
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .expect("fixed clock time must be unambiguous");
        Self::new(now)
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp such as `Wed Jun  3 14:02:11 2026`.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&collapsed, PARSE_FORMAT).ok()
}

/// Seconds since the epoch for a stored local timestamp.
pub fn local_epoch(text: &str) -> Option<i64> {
    let naive = parse_timestamp(text)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}
