use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::Fir;

/// Dashboard counters. Derived on every fetch, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub filed_today: usize,
}

/// Aggregates against the local wall clock.
#[must_use]
pub fn aggregate(records: &[Fir]) -> Stats {
    aggregate_at(records, &Local::now())
}

/// Single pass over `records`; "today" is the calendar day of `now` in its own zone.
#[must_use]
pub fn aggregate_at<Tz: TimeZone>(records: &[Fir], now: &DateTime<Tz>) -> Stats {
    let zone = now.timezone();
    let today = now.date_naive();

    records.iter().fold(Stats::default(), |mut acc, fir| {
        acc.total += 1;
        if fir.is_resolved {
            acc.resolved += 1;
        } else {
            acc.pending += 1;
        }
        if fir.timestamp.local_date(&zone) == Some(today) {
            acc.filed_today += 1;
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FirId, UnixTimeSecs};
    use chrono::{Duration, FixedOffset};
    use proptest::prelude::*;

    fn fir(id: u64, timestamp: i64, is_resolved: bool) -> Fir {
        Fir {
            id: FirId(id),
            timestamp: UnixTimeSecs(u64::try_from(timestamp).unwrap_or(0)),
            is_resolved,
            ..Fir::default()
        }
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(aggregate_at(&[], &Local::now()), Stats::default());
        assert_eq!(aggregate(&[]), Stats::default());
    }

    #[test]
    fn counts_resolved_and_pending() {
        let now = ist().with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let records = [fir(1, 0, true), fir(2, 0, false), fir(3, 0, false)];
        let stats = aggregate_at(&records, &now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.filed_today, 0);
    }

    #[test]
    fn filed_today_counts_only_current_local_day() {
        let zone = ist();
        let now = zone.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap();
        let start_of_today = zone.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let yesterday = start_of_today - Duration::hours(1);

        let records = [
            fir(1, start_of_today.timestamp(), false),
            fir(2, yesterday.timestamp(), false),
            fir(3, start_of_today.timestamp(), true),
            fir(4, (yesterday - Duration::hours(5)).timestamp(), true),
        ];

        let stats = aggregate_at(&records, &now);
        assert_eq!(stats.filed_today, 2);
        assert_eq!(stats.total, 4);
    }

    #[test]
    fn day_boundary_depends_on_zone() {
        // 20:00Z on the 9th is 01:30 on the 10th in IST.
        let ts = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap().timestamp();
        let records = [fir(1, ts, false)];

        let now_ist = ist().with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let now_utc = chrono::Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();

        assert_eq!(aggregate_at(&records, &now_ist).filed_today, 1);
        assert_eq!(aggregate_at(&records, &now_utc).filed_today, 0);
    }

    #[test]
    fn epoch_timestamp_never_counts_as_today() {
        let now = chrono::Utc.timestamp_opt(3600, 0).unwrap();
        let stats = aggregate_at(&[fir(1, 0, false)], &now);
        assert_eq!(stats.filed_today, 0);
    }

    proptest! {
        #[test]
        fn totals_are_consistent(
            entries in prop::collection::vec((0i64..2_000_000_000, any::<bool>()), 0..64),
            now_secs in 1i64..2_000_000_000,
        ) {
            let records: Vec<Fir> = entries
                .iter()
                .enumerate()
                .map(|(i, (ts, resolved))| fir(i as u64, *ts, *resolved))
                .collect();
            let now = ist().timestamp_opt(now_secs, 0).unwrap();

            let stats = aggregate_at(&records, &now);
            prop_assert_eq!(stats.total, records.len());
            prop_assert_eq!(stats.total, stats.pending + stats.resolved);
            prop_assert!(stats.filed_today <= stats.total);
        }
    }
}
