//! Recording length value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording length when none is configured
pub const DEFAULT_RECORD_SECS: u64 = 10;

/// Longest recording accepted from the command line or config (one hour)
pub const MAX_RECORD_SECS: u64 = 60 * 60;

/// Recording length, always non-zero, whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    secs: u64,
}

impl Duration {
    pub const fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_RECORD_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    pub const fn max_duration() -> Self {
        Self::from_secs(MAX_RECORD_SECS)
    }

    pub const fn as_millis(&self) -> u64 {
        self.secs.saturating_mul(1000)
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.secs)
    }
}

fn invalid(input: &str) -> DurationParseError {
    DurationParseError::InvalidFormat {
        input: input.to_string(),
    }
}

fn too_long(input: &str) -> DurationParseError {
    DurationParseError::TooLong {
        input: input.trim().to_string(),
        max: Duration::max_duration().to_string(),
    }
}

fn parse_component(digits: &str, input: &str) -> Result<u64, DurationParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input));
    }
    // Only overflow is left once every byte is a digit
    digits.parse().map_err(|_| too_long(input))
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Accepts `30s`, `2m`, `2m30s` (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();

        let (minutes, rest) = match input.split_once('m') {
            Some((m, rest)) => (parse_component(m, s)?, rest),
            None => (0, input.as_str()),
        };

        let seconds = if rest.is_empty() {
            if minutes == 0 && !input.contains('m') {
                return Err(invalid(s));
            }
            0
        } else {
            let digits = rest
                .strip_suffix('s')
                .ok_or_else(|| invalid(s))?;
            parse_component(digits, s)?
        };

        let secs = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| too_long(s))?;

        if secs == 0 {
            return Err(invalid(s));
        }
        if secs > MAX_RECORD_SECS {
            return Err(too_long(s));
        }

        Ok(Self { secs })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.secs / 60, self.secs % 60) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30_000);
    }

    #[test]
    fn parse_minutes_only() {
        let d: Duration = "2m".parse().unwrap();
        assert_eq!(d.as_secs(), 120);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "1M30S".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_with_whitespace() {
        let d: Duration = "  5s ".parse().unwrap();
        assert_eq!(d.as_secs(), 5);
    }

    #[test]
    fn parse_rejects_bad_input() {
        for bad in ["", "30", "abc", "30x", "m", "s", "0s", "0m", "1m2", "-5s", "1m-2s"] {
            assert!(bad.parse::<Duration>().is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn parse_rejects_over_an_hour() {
        assert_eq!("60m".parse::<Duration>(), Ok(Duration::max_duration()));
        for long in ["3601s", "61m", "18446744073709551615s", "99999999999999999999m"] {
            let err = long.parse::<Duration>().unwrap_err();
            assert!(
                matches!(err, DurationParseError::TooLong { .. }),
                "{:?} gave {:?}",
                long,
                err
            );
        }
    }

    #[test]
    fn as_millis_saturates() {
        assert_eq!(Duration::from_secs(u64::MAX).as_millis(), u64::MAX);
    }

    #[test]
    fn display_round_trips() {
        for text in ["45s", "3m", "2m30s"] {
            let d: Duration = text.parse().unwrap();
            assert_eq!(d.to_string(), text);
        }
    }

    #[test]
    fn default_is_ten_seconds() {
        assert_eq!(Duration::default().as_std(), StdDuration::from_secs(10));
    }
}
