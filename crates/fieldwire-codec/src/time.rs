use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{CodecError, Result};
use crate::scalar::FixedWidth;

/// Ticks per second; one tick is 100 nanoseconds.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

const NANOS_PER_TICK: u64 = 100;

/// A signed time span, stored as an 8-byte tick count (100 ns units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpan(i64);

impl TimeSpan {
    /// The zero-length span.
    pub const ZERO: TimeSpan = TimeSpan(0);

    /// Build from a raw tick count.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Raw tick count.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Convert from a [`Duration`], truncating sub-tick precision.
    ///
    /// Fails if the duration exceeds the signed 64-bit tick range.
    pub fn from_duration(duration: Duration) -> Result<Self> {
        let ticks = duration.as_nanos() / u128::from(NANOS_PER_TICK);
        i64::try_from(ticks)
            .map(Self)
            .map_err(|_| CodecError::TicksOutOfRange)
    }

    /// Convert to a [`Duration`]. Fails for negative spans, which
    /// `Duration` cannot represent.
    pub fn to_duration(self) -> Result<Duration> {
        let ticks = u64::try_from(self.0).map_err(|_| CodecError::TicksOutOfRange)?;
        Ok(ticks_to_duration(ticks))
    }
}

impl FixedWidth for TimeSpan {
    const WIDTH: usize = 8;

    fn put(self, dst: &mut [u8], offset: usize) -> Result<usize> {
        self.0.put(dst, offset)
    }

    fn take(src: &[u8], offset: usize) -> Result<Self> {
        i64::take(src, offset).map(Self)
    }
}

/// A UTC instant, stored as an 8-byte tick count (100 ns units) since
/// 1970-01-01T00:00:00Z.
///
/// The type only represents UTC: conversions from [`SystemTime`] measure
/// against [`UNIX_EPOCH`], so any zoned origin is normalized before it can
/// be encoded, and a decoded value is a UTC instant by construction.
/// Instants before the epoch are negative tick counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Build from a raw tick count since the Unix epoch.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Raw tick count since the Unix epoch.
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Convert from a [`SystemTime`], truncating sub-tick precision.
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => {
                let ticks = since.as_nanos() / u128::from(NANOS_PER_TICK);
                i64::try_from(ticks)
                    .map(Self)
                    .map_err(|_| CodecError::TicksOutOfRange)
            }
            Err(before) => {
                let ticks = before.duration().as_nanos() / u128::from(NANOS_PER_TICK);
                i64::try_from(ticks)
                    .map(|t| Self(-t))
                    .map_err(|_| CodecError::TicksOutOfRange)
            }
        }
    }

    /// Convert to a [`SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        let magnitude = ticks_to_duration(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }
}

// Split into whole seconds + remainder so the full i64 tick range
// converts without overflowing a nanosecond count.
fn ticks_to_duration(ticks: u64) -> Duration {
    let secs = ticks / TICKS_PER_SECOND as u64;
    let nanos = (ticks % TICKS_PER_SECOND as u64) * NANOS_PER_TICK;
    Duration::new(secs, nanos as u32)
}

impl FixedWidth for Timestamp {
    const WIDTH: usize = 8;

    fn put(self, dst: &mut [u8], offset: usize) -> Result<usize> {
        self.0.put(dst, offset)
    }

    fn take(src: &[u8], offset: usize) -> Result<Self> {
        i64::take(src, offset).map(Self)
    }
}
