//! Microsecond-precision trace timestamps.
//!
//! The runtime prints nanosecond fractions; everything downstream works in
//! microseconds, so the extra digits are dropped before parsing.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};

use crate::{ProtocolError, TIMESTAMP_DISPLAY_FORMAT, TIMESTAMP_FORMAT, TIMESTAMP_FRACTION_DIGITS};

/// A point in trace time, truncated to microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parse `YYYY-MM-DD-HH:MM:SS.fffffffff`.
    ///
    /// Fractions longer than six digits are cut (not rounded) to
    /// microseconds; shorter ones, including none at all, are accepted.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let truncated = truncate_fraction(raw);
        NaiveDateTime::parse_from_str(truncated, TIMESTAMP_FORMAT)
            .map(Timestamp)
            .map_err(|source| ProtocolError::Timestamp {
                value: raw.to_string(),
                source,
            })
    }

    /// Signed number of microseconds from `origin` to `self`.
    ///
    /// Spans any number of days; saturates instead of overflowing.
    pub fn micros_since(&self, origin: Timestamp) -> i64 {
        let delta = self.0.signed_duration_since(origin.0);
        delta.num_microseconds().unwrap_or(if delta < TimeDelta::zero() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// `self` moved `micros` microseconds into the past, `None` on overflow.
    pub fn checked_sub_micros(&self, micros: i64) -> Option<Timestamp> {
        self.0
            .checked_sub_signed(TimeDelta::microseconds(micros))
            .map(Timestamp)
    }

    /// `self` moved `micros` microseconds into the future, `None` on overflow.
    pub fn checked_add_micros(&self, micros: i64) -> Option<Timestamp> {
        self.0
            .checked_add_signed(TimeDelta::microseconds(micros))
            .map(Timestamp)
    }
}

impl FromStr for Timestamp {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_DISPLAY_FORMAT))
    }
}

fn truncate_fraction(raw: &str) -> &str {
    match raw.rfind('.') {
        Some(dot) => {
            let keep = dot + 1 + TIMESTAMP_FRACTION_DIGITS;
            raw.get(..keep).unwrap_or(raw)
        }
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nanoseconds_are_cut_not_rounded() {
        let t = Timestamp::parse("2016-03-24-09:18:46.359427999").unwrap();
        assert_eq!(t.to_string(), "2016-03-24-09:18:46.359427");
    }

    #[test]
    fn test_short_fraction_accepted() {
        let t = Timestamp::parse("2016-03-24-09:18:46.5").unwrap();
        assert_eq!(t.to_string(), "2016-03-24-09:18:46.500000");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("2016-03-24 09:18:46.359427942").is_err());
    }
}
