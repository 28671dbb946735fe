//! Local-day windows.
//!
//! A user's "day" runs from 06:00 local time to one second before the next
//! 06:00. Windows are stored as absolute UTC instants so that sweeps can
//! compare them against the wall clock without knowing the owner's zone.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{Timestamp, Timezone, ValidationError};

/// Local hour at which a day window opens.
pub const DAY_START_HOUR: u32 = 6;

/// Closed `[from, to]` interval covering one local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayWindow {
    from: Timestamp,
    to: Timestamp,
}

impl DayWindow {
    /// Rebuilds a stored window, enforcing `to > from`.
    pub fn new(from: Timestamp, to: Timestamp) -> Result<Self, ValidationError> {
        if !to.is_after(&from) {
            return Err(ValidationError::invalid_format(
                "window",
                format!(
                    "window end {} must be after start {}",
                    to.as_datetime(),
                    from.as_datetime()
                ),
            ));
        }
        Ok(Self { from, to })
    }

    /// Window for the given local calendar date.
    pub fn for_date(date: NaiveDate, zone: Timezone) -> Self {
        let from = local_day_start(date, zone.tz());
        Self {
            from,
            to: from.add_secs(Duration::days(1).num_seconds() - 1),
        }
    }

    /// Window whose local day contains `instant`.
    ///
    /// Before 06:00 local time the instant still belongs to the previous day.
    pub fn containing(instant: Timestamp, zone: Timezone) -> Self {
        Self::for_date(local_date_of(instant, zone), zone)
    }

    pub fn from(&self) -> Timestamp {
        self.from
    }

    pub fn to(&self) -> Timestamp {
        self.to
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: Timestamp) -> bool {
        !instant.is_before(&self.from) && !instant.is_after(&self.to)
    }

    /// Calendar date this window was opened for, in the given zone.
    pub fn local_date(&self, zone: Timezone) -> NaiveDate {
        self.from.in_zone(&zone.tz()).date_naive()
    }

    /// The window of the following local day.
    pub fn next(&self, zone: Timezone) -> Self {
        let date = self.local_date(zone);
        Self::for_date(date.succ_opt().unwrap_or(date), zone)
    }
}

/// Local calendar date of the day window that contains `instant`.
pub fn local_date_of(instant: Timestamp, zone: Timezone) -> NaiveDate {
    let local = instant.in_zone(&zone.tz());
    let date = local.date_naive();
    if local.hour() < DAY_START_HOUR {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

fn local_day_start(date: NaiveDate, tz: Tz) -> Timestamp {
    let naive = date.and_time(NaiveTime::default()) + Duration::hours(DAY_START_HOUR as i64);
    let resolved = resolve_local(tz, naive)
        // 06:00 skipped by a DST jump: the day opens at the first valid hour.
        .or_else(|| resolve_local(tz, naive + Duration::hours(1)))
        .unwrap_or_else(|| chrono::Utc.from_utc_datetime(&naive));
    Timestamp::from_datetime(resolved)
}

fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&chrono::Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&chrono::Utc)),
        LocalResult::None => None,
    }
}
