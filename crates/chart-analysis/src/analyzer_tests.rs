#[cfg(test)]
mod tests {
    use crate::analyzer::ChartAnalyzer;
    use chrono::{NaiveDate, NaiveDateTime};
    use scanner_core::Bar;

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
    }

    fn bar(raw: &str, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: ts(raw),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn daily(date: &str, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    /// Last-day 1m series: premarket low below the session low, premarket
    /// high above the session high.
    fn sample_m1() -> Vec<Bar> {
        vec![
            // Prior day, should be ignored everywhere
            bar("2025-05-06 09:40", 2.0, 2.5, 1.9, 2.1, 900.0),
            // Premarket
            bar("2025-05-07 08:00", 1.1, 1.3, 1.0, 1.2, 500.0),
            bar("2025-05-07 09:00", 1.2, 3.0, 1.1, 2.9, 4000.0),
            // Market session
            bar("2025-05-07 09:31", 2.9, 2.95, 1.5, 1.6, 3000.0),
            bar("2025-05-07 09:40", 1.6, 2.4, 1.55, 2.3, 2500.0),
            bar("2025-05-07 10:15", 2.3, 2.6, 2.2, 2.5, 1000.0),
        ]
    }

    fn sample_d1() -> Vec<Bar> {
        vec![
            daily("2025-05-05", 2.2, 1.8, 2.0, 10_000.0),
            daily("2025-05-06", 2.5, 1.9, 2.0, 9_000.0),
        ]
    }

    #[test]
    fn day_low_excludes_premarket() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        // Premarket low is 1.0 but the session low is 1.5
        assert_eq!(snap.day_low, Some(1.5));
    }

    #[test]
    fn day_high_includes_premarket() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        assert_eq!(snap.day_high, Some(3.0));
        assert_eq!(snap.premarket_high, Some(3.0));
        assert_eq!(snap.premarket_low, Some(1.0));
    }

    #[test]
    fn day_close_is_last_bar_of_last_day() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        assert_eq!(snap.day_close, Some(2.5));
    }

    #[test]
    fn yesterday_close_needs_two_daily_bars() {
        let analyzer = ChartAnalyzer::new();
        let one_day = vec![daily("2025-05-06", 2.5, 1.9, 2.0, 9_000.0)];
        assert_eq!(
            analyzer.snapshot("TEST", &sample_m1(), &[], &one_day).yesterday_close,
            None
        );
        assert_eq!(
            analyzer.snapshot("TEST", &sample_m1(), &[], &sample_d1()).yesterday_close,
            Some(2.0)
        );
    }

    #[test]
    fn change_percentages_against_yesterday_close() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        // yesterday_close 2.0, day_high 3.0, day_close 2.5
        assert_eq!(snap.high_change_percentage, Some(50.0));
        assert_eq!(snap.close_change_percentage, Some(25.0));
    }

    #[test]
    fn change_percentages_null_without_yesterday_close() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &[]);
        assert_eq!(snap.high_change_percentage, None);
        assert_eq!(snap.close_change_percentage, None);
    }

    #[test]
    fn most_volume_high_is_bullish_bar_over_full_day() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        // Highest-volume bullish bar is the 09:00 premarket bar (vol 4000)
        assert_eq!(snap.most_volume_high, Some(3.0));
    }

    #[test]
    fn most_volume_low_is_bearish_market_bar_only() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        // Only bearish market bar is 09:31 (close 1.6 < open 2.9), low 1.5
        assert_eq!(snap.most_volume_low, Some(1.5));
    }

    #[test]
    fn market_open_range_defaults_to_0931_0945() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &[], &sample_d1());
        // Bars at 09:31 and 09:40 fall in the range; 10:15 does not
        assert_eq!(snap.market_open_high, Some(2.95));
        assert_eq!(snap.market_open_low, Some(1.5));
    }

    #[test]
    fn open_range_can_wrap_past_midnight() {
        let bars = vec![
            bar("2025-05-07 12:00", 1.0, 1.1, 0.95, 1.0, 100.0),
            bar("2025-05-07 23:55", 1.0, 1.4, 0.9, 1.2, 100.0),
        ];
        let analyzer = ChartAnalyzer::new().with_open_range(
            chrono::NaiveTime::from_hms_opt(23, 50, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(0, 10, 0).unwrap(),
        );
        let snap = analyzer.snapshot("TEST", &bars, &[], &[]);
        // The 23:55 bar sits after the wrapped interval's start; the noon
        // bar is outside it on both sides of midnight.
        assert_eq!(snap.market_open_high, Some(1.4));
        assert_eq!(snap.market_open_low, Some(0.9));
    }

    #[test]
    fn empty_inputs_yield_all_null() {
        let snap = ChartAnalyzer::new().snapshot("TEST", &[], &[], &[]);
        assert_eq!(snap.day_high, None);
        assert_eq!(snap.day_low, None);
        assert_eq!(snap.day_close, None);
        assert_eq!(snap.premarket_high, None);
        assert_eq!(snap.market_open_high, None);
        assert!(snap.key_levels.is_empty());
    }

    #[test]
    fn key_levels_pick_nearest_resistance_above_day_high() {
        // Session volume = 4000 + 1000 = 5000 (5m bars of the last day)
        let m5 = vec![
            bar("2025-05-07 04:00", 1.1, 1.3, 1.0, 1.2, 4000.0),
            bar("2025-05-07 09:30", 2.9, 3.0, 1.5, 1.6, 1000.0),
        ];
        // day_high is 3.0; qualifying daily bars need volume > 5000 and high > 3.0
        let d1 = vec![
            daily("2025-04-01", 4.0, 3.5, 3.8, 9_000.0), // low above day high -> 3.5
            daily("2025-04-02", 3.6, 2.5, 3.0, 8_000.0), // low below day high -> 3.6
            daily("2025-04-03", 5.0, 4.5, 4.8, 7_000.0), // -> 4.5
            daily("2025-04-04", 6.0, 5.5, 5.8, 100.0),   // volume too small
            daily("2025-04-07", 2.9, 2.0, 2.5, 9_000.0), // high below day high
            daily("2025-04-08", 4.0, 3.5, 3.9, 9_500.0), // duplicate 3.5
        ];
        let snap = ChartAnalyzer::new().snapshot("TEST", &sample_m1(), &m5, &d1);
        assert_eq!(snap.key_levels, vec![3.5, 3.6, 4.5]);
    }

    #[test]
    fn key_levels_sorted_deduped_and_truncated() {
        let m5 = vec![bar("2025-05-07 04:05", 1.0, 1.0, 1.0, 1.0, 10.0)];
        let d1: Vec<Bar> = (0..10)
            .map(|i| {
                daily(
                    &format!("2025-04-{:02}", i + 1),
                    10.0 - i as f64 * 0.5,
                    9.0 - i as f64 * 0.5,
                    9.5,
                    1_000.0,
                )
            })
            .collect();
        let analyzer = ChartAnalyzer::new().with_key_level_count(4);
        let snap = analyzer.snapshot("TEST", &sample_m1(), &m5, &d1);
        assert!(snap.key_levels.len() <= 4);
        assert!(snap.key_levels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn key_levels_empty_without_day_high() {
        let d1 = vec![daily("2025-04-01", 4.0, 3.5, 3.8, 9_000.0)];
        let snap = ChartAnalyzer::new().snapshot("TEST", &[], &[], &d1);
        assert!(snap.key_levels.is_empty());
    }

    #[test]
    fn values_rounded_to_two_decimals() {
        let bars = vec![bar("2025-05-07 09:35", 1.23456, 1.98765, 1.11111, 1.55555, 100.0)];
        let snap = ChartAnalyzer::new().snapshot("TEST", &bars, &[], &[]);
        assert_eq!(snap.day_high, Some(1.99));
        assert_eq!(snap.day_low, Some(1.11));
        assert_eq!(snap.day_close, Some(1.56));
    }
}
