use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

use super::errors::ExpiryError;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_MONTH: u64 = 30 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Token lifetime, expressed in a single unit.
///
/// Exactly one field is expected to be non-zero. When several are set the
/// largest unit wins and the rest are ignored: years, then months, days,
/// hours, minutes, seconds. A month is 30 days and a year 365 days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpirySpec {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl ExpirySpec {
    pub fn years(years: u32) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    pub fn months(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    pub fn days(days: u32) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn hours(hours: u32) -> Self {
        Self {
            hours,
            ..Self::default()
        }
    }

    pub fn minutes(minutes: u32) -> Self {
        Self {
            minutes,
            ..Self::default()
        }
    }

    pub fn seconds(seconds: u32) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// Resolve to a duration using the first non-zero field.
    ///
    /// # Errors
    /// * `Unspecified` - Every field is zero
    /// * `OutOfRange` - The duration does not fit a timestamp offset
    pub fn resolve(&self) -> Result<Duration, ExpiryError> {
        let seconds = [
            (self.years, SECONDS_PER_YEAR),
            (self.months, SECONDS_PER_MONTH),
            (self.days, SECONDS_PER_DAY),
            (self.hours, SECONDS_PER_HOUR),
            (self.minutes, SECONDS_PER_MINUTE),
            (self.seconds, 1),
        ]
        .into_iter()
        .find(|(magnitude, _)| *magnitude != 0)
        .map(|(magnitude, unit)| u64::from(magnitude) * unit)
        .ok_or(ExpiryError::Unspecified)?;

        i64::try_from(seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(ExpiryError::OutOfRange(seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_unit_resolution() {
        assert_eq!(ExpirySpec::seconds(45).resolve(), Ok(Duration::seconds(45)));
        assert_eq!(ExpirySpec::minutes(30).resolve(), Ok(Duration::minutes(30)));
        assert_eq!(ExpirySpec::hours(2).resolve(), Ok(Duration::hours(2)));
        assert_eq!(ExpirySpec::days(7).resolve(), Ok(Duration::days(7)));
        assert_eq!(ExpirySpec::months(1).resolve(), Ok(Duration::days(30)));
        assert_eq!(ExpirySpec::years(1).resolve(), Ok(Duration::days(365)));
    }

    #[test]
    fn test_largest_unit_wins() {
        let spec = ExpirySpec {
            years: 1,
            minutes: 30,
            ..ExpirySpec::default()
        };
        assert_eq!(spec.resolve(), Ok(Duration::days(365)));

        let spec = ExpirySpec {
            hours: 3,
            minutes: 59,
            seconds: 59,
            ..ExpirySpec::default()
        };
        assert_eq!(spec.resolve(), Ok(Duration::hours(3)));
    }

    #[test]
    fn test_all_zero_is_unspecified() {
        assert_eq!(
            ExpirySpec::default().resolve(),
            Err(ExpiryError::Unspecified)
        );
    }

    #[test]
    fn test_out_of_range() {
        let result = ExpirySpec::years(u32::MAX).resolve();
        assert!(matches!(result, Err(ExpiryError::OutOfRange(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let spec: ExpirySpec = serde_json::from_str(r#"{"minutes": 30}"#).unwrap();
        assert_eq!(spec, ExpirySpec::minutes(30));
    }
}
