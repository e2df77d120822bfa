use chrono::{DateTime, Utc};

/// Represents the refresh policy outcome, decided once per run and
/// never re-evaluated mid-run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshDecision {
    /// The run proceeds.
    Due,
    /// The refresh interval has not elapsed yet, the run
    /// short-circuits without touching any store.
    Throttled,
}

/// Decides whether a folder is due for synchronization.
///
/// An enforced run is always due, as is a run with a non-positive
/// refresh interval or a folder that never synchronized. Otherwise the
/// folder is due once the interval has elapsed since the last marker.
pub fn evaluate(
    enforce: bool,
    refresh_interval_ms: i64,
    last_sync: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> RefreshDecision {
    if enforce {
        return RefreshDecision::Due;
    }

    if refresh_interval_ms <= 0 {
        return RefreshDecision::Due;
    }

    let last_sync = match last_sync {
        None => return RefreshDecision::Due,
        Some(last_sync) => last_sync,
    };

    if now.signed_duration_since(last_sync).num_milliseconds() >= refresh_interval_ms {
        RefreshDecision::Due
    } else {
        RefreshDecision::Throttled
    }
}

#[cfg(test)]
mod refresh {
    use chrono::{Duration, TimeZone, Utc};

    use super::{evaluate, RefreshDecision};

    #[test]
    fn enforce_is_always_due() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            RefreshDecision::Due,
            evaluate(true, 60_000, Some(now), now),
        );
    }

    #[test]
    fn non_positive_interval_is_always_due() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(RefreshDecision::Due, evaluate(false, 0, Some(now), now));
        assert_eq!(RefreshDecision::Due, evaluate(false, -1, Some(now), now));
    }

    #[test]
    fn never_synchronized_is_due() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(RefreshDecision::Due, evaluate(false, 60_000, None, now));
    }

    #[test]
    fn elapsed_interval_is_due() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        let last_sync = now - Duration::milliseconds(60_000);
        assert_eq!(
            RefreshDecision::Due,
            evaluate(false, 60_000, Some(last_sync), now),
        );
    }

    #[test]
    fn open_window_is_throttled() {
        let now = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        let last_sync = now - Duration::milliseconds(59_999);
        assert_eq!(
            RefreshDecision::Throttled,
            evaluate(false, 60_000, Some(last_sync), now),
        );
    }
}
