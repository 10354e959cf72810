//! Next-dose estimation from a fixed regimen cadence.
//!
//! The anchor is the most recent dose by timestamp, wherever it sits in the
//! input. Treatment pauses are not taken into account.

use crate::{DosingEvent, Error, Result};
use chrono::{DateTime, Duration, Utc};

/// When the next dose is due: latest `administered_at` plus `interval`.
///
/// Returns `Ok(None)` for an empty history, and `InvalidInput` when the due
/// date falls outside the representable date range.
pub fn next_due_date(events: &[DosingEvent], interval: Duration) -> Result<Option<DateTime<Utc>>> {
    if interval <= Duration::zero() {
        return Err(Error::InvalidInput(format!(
            "dosing interval must be positive, got {}",
            interval
        )));
    }

    match events.iter().map(DosingEvent::administered_at).max() {
        None => Ok(None),
        Some(latest) => latest.checked_add_signed(interval).map(Some).ok_or_else(|| {
            Error::InvalidInput(format!(
                "next due date is out of range: {} + {}",
                latest, interval
            ))
        }),
    }
}

/// [`next_due_date`] for whole-day cadences (7 for weekly injections).
pub fn next_due_in_days(events: &[DosingEvent], interval_days: u32) -> Result<Option<DateTime<Utc>>> {
    next_due_date(events, Duration::days(i64::from(interval_days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap() + Duration::days(n)
    }

    fn dose_on(n: i64) -> DosingEvent {
        DosingEvent::new(2.5, day(n)).unwrap()
    }

    #[test]
    fn test_empty_history_has_no_prediction() {
        assert_eq!(next_due_in_days(&[], 7).unwrap(), None);
    }

    #[test]
    fn test_single_dose_weekly() {
        assert_eq!(next_due_in_days(&[dose_on(0)], 7).unwrap(), Some(day(7)));
    }

    #[test]
    fn test_uses_latest_timestamp_not_last_element() {
        let events = [dose_on(14), dose_on(0), dose_on(7)];
        assert_eq!(next_due_in_days(&events, 7).unwrap(), Some(day(21)));
    }

    #[test]
    fn test_duplicate_latest_timestamps() {
        let events = [dose_on(7), dose_on(7), dose_on(3)];
        assert_eq!(next_due_in_days(&events, 7).unwrap(), Some(day(14)));
    }

    #[test]
    fn test_sub_day_interval() {
        let events = [dose_on(0)];
        assert_eq!(
            next_due_date(&events, Duration::hours(12)).unwrap(),
            Some(day(0) + Duration::hours(12))
        );
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        assert!(matches!(
            next_due_in_days(&[dose_on(0)], 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(next_due_date(&[], Duration::days(-7)).is_err());
    }

    #[test]
    fn test_out_of_range_due_date_is_rejected() {
        assert!(matches!(
            next_due_in_days(&[dose_on(0)], u32::MAX),
            Err(Error::InvalidInput(_))
        ));
        // Empty history never computes a date, so the interval alone is fine
        assert_eq!(next_due_in_days(&[], u32::MAX).unwrap(), None);
    }
}
