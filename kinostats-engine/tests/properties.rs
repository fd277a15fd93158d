//! Propriétés du moteur sur des historiques aléatoires.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use kinostats_db::models::Draw;
use kinostats_engine::frequency::count;
use kinostats_engine::streak::streak;
use kinostats_engine::{build_report, merge, top, MergeOutcome, StatsConfig};

const MAX_NUM: u8 = 20;

/// Historique du plus récent au plus ancien, un tirage toutes les 5 minutes.
fn history_strategy() -> impl Strategy<Value = Vec<Draw>> {
    prop::collection::vec(prop::collection::btree_set(1..=MAX_NUM, 0..8), 0..40).prop_map(|sets| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let n = sets.len() as i64;
        sets.into_iter()
            .enumerate()
            .map(|(i, set)| Draw::new(start + Duration::minutes(5 * (n - i as i64)), set))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_frequency_bounded_by_effective_window(history in history_strategy(), window in 0usize..60) {
        let effective = window.min(history.len()) as u32;
        let freq = count(&history, window, MAX_NUM);
        prop_assert_eq!(freq.len(), MAX_NUM as usize);
        for (_, c) in freq.iter() {
            prop_assert!(c <= effective);
        }
    }

    #[test]
    fn prop_streak_capped_and_zero_for_latest(history in history_strategy(), window in 0usize..60) {
        let effective = window.min(history.len());
        let streaks = streak(&history, window, MAX_NUM);
        for (_, s) in streaks.iter() {
            prop_assert!(s as usize <= effective);
        }
        if effective > 0 {
            for &n in history[0].numbers.numbers() {
                prop_assert_eq!(streaks.get(n), Some(0));
            }
        }
    }

    #[test]
    fn prop_top_size_and_order(history in history_strategy(), n in 0usize..30) {
        let freq = count(&history, history.len(), MAX_NUM);
        let ranked = top(&freq, n);
        prop_assert_eq!(ranked.len(), n.min(MAX_NUM as usize));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].frequency >= pair[1].frequency);
            if pair[0].frequency == pair[1].frequency {
                prop_assert!(pair[0].number < pair[1].number);
            }
        }
    }

    #[test]
    fn prop_merge_without_candidate_or_stale_is_identity(history in history_strategy()) {
        let merged = merge(&history, None);
        prop_assert_eq!(merged.history.as_ref(), history.as_slice());

        if let Some(latest) = history.first() {
            let stale = Draw::new(latest.drawn_at, [1, 2, 3]);
            let merged = merge(&history, Some(stale));
            prop_assert_eq!(merged.outcome, MergeOutcome::Stale);
            prop_assert_eq!(merged.history.as_ref(), history.as_slice());
        }
    }

    #[test]
    fn prop_merge_prepends_newer(history in history_strategy()) {
        let newest = history
            .first()
            .map(|d| d.drawn_at + Duration::minutes(5))
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
        let candidate = Draw::new(newest, [4, 5]);
        let merged = merge(&history, Some(candidate.clone()));
        prop_assert_eq!(merged.outcome, MergeOutcome::Prepended);
        prop_assert_eq!(merged.history.len(), history.len() + 1);
        prop_assert_eq!(&merged.history[0], &candidate);
        prop_assert_eq!(&merged.history[1..], history.as_slice());
    }

    #[test]
    fn prop_report_partitions_range(history in history_strategy(), top_n in 0usize..30, window in 1usize..60) {
        let config = StatsConfig {
            max_num: MAX_NUM,
            ranking_window: None,
            display_windows: vec![window],
            top_n,
        };
        let report = build_report(&history, &config);
        let mut numbers: Vec<u8> = report.top.iter().chain(report.others.iter()).map(|r| r.number).collect();
        prop_assert!(report.others.windows(2).all(|w| w[0].number < w[1].number));
        numbers.sort_unstable();
        prop_assert_eq!(numbers, (1..=MAX_NUM).collect::<Vec<_>>());
    }
}
