//! Time source used by the handlers.
//!
//! Handlers never call `Utc::now()` directly; they go through [`Clock`] so
//! tests can pin the timestamp.

use chrono::{DateTime, Utc};

/// ISO-8601 layout for response timestamps: naive UTC, microsecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Layout used when the sub-second part is zero.
const WHOLE_SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Provides the current time.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC time formatted with [`iso_timestamp`].
    fn timestamp(&self) -> String {
        iso_timestamp(self.now())
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the instant it was created with.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SS.ffffff` (no offset suffix).
///
/// The fraction is left out entirely when the microsecond part is zero.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    let format = if at.timestamp_subsec_micros() == 0 {
        WHOLE_SECOND_FORMAT
    } else {
        TIMESTAMP_FORMAT
    };
    at.naive_utc().format(format).to_string()
}
