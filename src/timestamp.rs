use std::cmp;
use std::fmt;
use std::time;

use serde::{Deserialize, Serialize};

// Leaves room for a leap second past the usual nanosecond range.
const MAX_NANOSEC: u32 = 1_999_999_999;

/// A point in UTC time, stored as seconds and nanoseconds relative to the
/// UNIX epoch. Nanoseconds may run past 999 999 999 to represent a leap
/// second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    sec: i64,
    nano: u32,
}

impl Timestamp {
    /// Create a timestamp from a raw seconds + nanoseconds value. Fails if
    /// the nanoseconds exceed the leap-second headroom.
    pub fn from_utc(sec: i64, nano: u32) -> Option<Timestamp> {
        if nano > MAX_NANOSEC {
            None
        } else {
            Some(Timestamp { sec, nano })
        }
    }

    /// Create a timestamp from a whole number of seconds.
    pub fn from_sec(sec: i64) -> Timestamp {
        Timestamp { sec, nano: 0 }
    }

    /// The current system time.
    pub fn now() -> Timestamp {
        match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
            Ok(d) => Timestamp {
                sec: d.as_secs() as i64,
                nano: d.subsec_nanos(),
            },
            Err(err) => {
                // Clock is before the epoch
                let d = err.duration();
                let (sec, nano) = if d.subsec_nanos() == 0 {
                    (-(d.as_secs() as i64), 0)
                } else {
                    (-(d.as_secs() as i64) - 1, 1_000_000_000 - d.subsec_nanos())
                };
                Timestamp { sec, nano }
            }
        }
    }

    /// Minimum possible time that can be represented
    pub fn min_value() -> Timestamp {
        Timestamp {
            sec: i64::MIN,
            nano: 0,
        }
    }

    /// Maximum possible time that can be represented
    pub fn max_value() -> Timestamp {
        Timestamp {
            sec: i64::MAX,
            nano: MAX_NANOSEC,
        }
    }

    /// Add 1 nanosecond to the timestamp, saturating at the maximum value.
    pub fn next(mut self) -> Timestamp {
        if self.nano < MAX_NANOSEC {
            self.nano += 1;
        } else if self.sec < i64::MAX {
            self.nano = 0;
            self.sec += 1;
        }
        self
    }

    /// Subtract 1 nanosecond from the timestamp, saturating at the minimum
    /// value.
    pub fn prev(mut self) -> Timestamp {
        if self.nano > 0 {
            self.nano -= 1;
        } else if self.sec > i64::MIN {
            self.nano = MAX_NANOSEC;
            self.sec -= 1;
        }
        self
    }

    /// Return the UNIX timestamp (number of seconds since January 1, 1970
    /// 0:00:00 UTC).
    pub fn timestamp_utc(&self) -> i64 {
        self.sec
    }

    /// Return the number of nanoseconds past the second count.
    pub fn timestamp_subsec_nanos(&self) -> u32 {
        self.nano
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.sec.cmp(&other.sec).then(self.nano.cmp(&other.nano))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.nano == 0 {
            write!(f, "{}s", self.sec)
        } else {
            write!(f, "{}.{:09}s", self.sec, self.nano)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        let a = Timestamp::from_utc(10, 0).unwrap();
        let b = Timestamp::from_utc(10, 1).unwrap();
        let c = Timestamp::from_utc(11, 0).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(Timestamp::min_value() < a);
        assert!(c < Timestamp::max_value());
    }

    #[test]
    fn nano_range() {
        assert!(Timestamp::from_utc(0, MAX_NANOSEC).is_some());
        assert!(Timestamp::from_utc(0, MAX_NANOSEC + 1).is_none());
    }

    #[test]
    fn next_prev() {
        let t = Timestamp::from_utc(5, MAX_NANOSEC).unwrap();
        assert_eq!(t.next(), Timestamp::from_sec(6));
        assert_eq!(Timestamp::from_sec(6).prev(), t);
        // Saturation at the extremes
        assert_eq!(Timestamp::max_value().next(), Timestamp::max_value());
        assert_eq!(Timestamp::min_value().prev(), Timestamp::min_value());
    }
}
