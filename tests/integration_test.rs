//! Integration tests.
//!
//! Tests cover:
//! - Session resolution probe budgets and invalid-instrument propagation
//! - The indicator engine over realistic daily histories
//! - KDJ recursion across an undefined gap
//! - Movement classifier laws (property-based)

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use tickchart::domain::engine::{compute_chart_indicators, MA_WINDOWS};
use tickchart::domain::error::TickchartError;
use tickchart::domain::movement::{bar_movement, session_movement, Movement};
use tickchart::domain::price::PriceSeries;
use tickchart::domain::session::{resolve_session_window, MAX_BACKSTEPS};

mod session_resolution {
    use super::*;

    #[test]
    fn succeeds_on_the_sixth_probe() {
        let today = date(2024, 3, 20);
        let found = date(2024, 3, 15); // five empty days, data on the sixth
        let before = date(2024, 3, 14);
        let port = MockPricePort::new()
            .with_session("BHP", found, &[100.0, 101.0])
            .with_session("BHP", before, &[98.0]);

        let window = resolve_session_window(&port, "BHP", today);

        assert!(window.is_resolved());
        assert_eq!(window.current.last_close(), Some(101.0));
        assert_eq!(window.previous.last_close(), Some(98.0));
        // six probes walk down to the current session, one finds the previous
        let expected: Vec<_> = (0..=6).map(|i| today - chrono::Duration::days(i)).collect();
        assert_eq!(port.probed_days(), expected);
    }

    #[test]
    fn gives_up_after_six_probes_and_skips_the_previous_side() {
        let today = date(2024, 3, 20);
        let port = MockPricePort::new();

        let window = resolve_session_window(&port, "GHOST", today);

        assert!(!window.is_resolved());
        assert!(window.current.is_empty());
        assert!(window.previous.is_empty());
        let expected: Vec<_> = (0..=5).map(|i| today - chrono::Duration::days(i)).collect();
        assert_eq!(port.probed_days(), expected);
        assert_eq!(port.intraday_call_count(), MAX_BACKSTEPS + 1);
    }

    #[test]
    fn one_day_beyond_the_budget_is_invisible() {
        let today = date(2024, 3, 20);
        // data exists, but only on the seventh day back
        let port = MockPricePort::new().with_session("BHP", date(2024, 3, 13), &[100.0]);

        let window = resolve_session_window(&port, "BHP", today);

        assert!(!window.is_resolved());
        assert_eq!(port.intraday_call_count(), 6);
    }

    #[test]
    fn fetch_errors_are_walked_over() {
        let today = date(2024, 3, 20);
        let friday = date(2024, 3, 15);
        let thursday = date(2024, 3, 14);
        let port = MockPricePort::new()
            .with_error_day("BHP", today)
            .with_error_day("BHP", date(2024, 3, 19))
            .with_session("BHP", friday, &[100.0])
            .with_session("BHP", thursday, &[97.0]);

        let window = resolve_session_window(&port, "BHP", today);

        assert_eq!(window.current.last_close(), Some(100.0));
        assert_eq!(window.previous.last_close(), Some(97.0));
    }

    #[test]
    fn previous_side_has_its_own_budget() {
        let today = date(2024, 3, 20);
        let port = MockPricePort::new().with_session("BHP", today, &[100.0]);

        let window = resolve_session_window(&port, "BHP", today);

        assert!(window.is_resolved());
        assert!(window.previous.is_empty());
        // one hit for the current side, six misses for the previous side
        assert_eq!(port.intraday_call_count(), 7);
    }

    #[test]
    fn previous_timestamps_precede_current_timestamps() {
        let monday = date(2024, 3, 18);
        let friday = date(2024, 3, 15);
        let port = MockPricePort::new()
            .with_session("BHP", monday, &[100.0, 101.0, 102.0])
            .with_session("BHP", friday, &[97.0, 98.0]);

        let window = resolve_session_window(&port, "BHP", monday);

        let first_current = window.current.bars.first().unwrap().timestamp;
        assert!(!window.previous.is_empty());
        for bar in &window.previous.bars {
            assert!(bar.timestamp < first_current);
        }
    }

    #[test]
    fn session_movement_against_previous_close() {
        let monday = date(2024, 3, 18);
        let friday = date(2024, 3, 15);
        let port = MockPricePort::new()
            .with_session("BHP", monday, &[100.0, 104.5])
            .with_session("BHP", friday, &[101.0, 102.0]);

        let window = resolve_session_window(&port, "BHP", monday);
        assert_eq!(session_movement(&window), Some(Movement::Up));

        let port = MockPricePort::new().with_session("BHP", monday, &[100.0]);
        let window = resolve_session_window(&port, "BHP", monday);
        assert_eq!(session_movement(&window), None);
    }
}

mod indicator_engine {
    use super::*;

    #[test]
    fn five_day_average_over_ten_closes() {
        let closes = [10.0, 11.0, 9.0, 12.0, 13.0, 11.0, 14.0, 15.0, 13.0, 16.0];
        let series = PriceSeries::new(
            "BHP".into(),
            daily_bars("BHP", date(2024, 1, 1), &closes),
        );

        let indicators = compute_chart_indicators(&series).unwrap();
        let ma5 = &indicators.mas[0];

        assert_eq!(ma5.len(), 10);
        for i in 0..4 {
            assert!(!ma5.values[i].valid, "position {} should be undefined", i);
        }
        assert_relative_eq!(
            ma5.values[4].value,
            (10.0 + 11.0 + 9.0 + 12.0 + 13.0) / 5.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(ma5.values[9].value, 13.8, epsilon = 1e-9);
    }

    #[test]
    fn every_column_spans_a_full_year_of_bars() {
        let closes: Vec<f64> = (0..260)
            .map(|i| 100.0 + (i as f64 * 0.31).sin() * 8.0 + i as f64 * 0.05)
            .collect();
        let series = PriceSeries::new(
            "BHP".into(),
            daily_bars("BHP", date(2023, 1, 1), &closes),
        );

        let indicators = compute_chart_indicators(&series).unwrap();

        for (ma, window) in indicators.mas.iter().zip(MA_WINDOWS) {
            assert_eq!(ma.len(), 260);
            assert_eq!(ma.warmup_len(), window - 1);
        }
        // ma250 defined near the end of the year
        assert!(indicators.mas[6].values[249].valid);
        assert_eq!(indicators.rsi.warmup_len(), 14);
        assert_eq!(indicators.macd.line.warmup_len(), 25);
        assert_eq!(indicators.macd.signal.warmup_len(), 33);
        assert_eq!(indicators.kdj.k.warmup_len(), 8);
    }

    #[test]
    fn histogram_is_twice_the_spread_everywhere() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 50.0 + (i as f64 * 0.7).cos() * 4.0)
            .collect();
        let series = PriceSeries::new(
            "BHP".into(),
            daily_bars("BHP", date(2024, 1, 1), &closes),
        );

        let indicators = compute_chart_indicators(&series).unwrap();
        let macd = &indicators.macd;

        let mut checked = 0;
        for i in 0..closes.len() {
            if macd.histogram.values[i].valid {
                let expected = 2.0 * (macd.line.values[i].value - macd.signal.values[i].value);
                assert_relative_eq!(macd.histogram.values[i].value, expected, epsilon = 1e-12);
                checked += 1;
            }
        }
        assert!(checked > 40);
    }

    #[test]
    fn kdj_gap_holds_the_recursion_state() {
        // varied bars fill the window, a run of one-price bars collapses
        // it at position 16, then a ranged bar reopens it
        let start = date(2024, 1, 1);
        let mut bars = Vec::new();
        for i in 0..8 {
            let day = start + chrono::Duration::days(i);
            let mut bar = daily_bar("BHP", day, 100.0);
            bar.high = 110.0;
            bar.low = 90.0;
            bars.push(bar);
        }
        for i in 8..17 {
            let day = start + chrono::Duration::days(i);
            let mut bar = daily_bar("BHP", day, 104.0);
            bar.open = 104.0;
            bar.high = 104.0;
            bar.low = 104.0;
            bars.push(bar);
        }
        let day = start + chrono::Duration::days(17);
        let mut last = daily_bar("BHP", day, 104.0);
        last.open = 100.0;
        last.high = 105.0;
        last.low = 95.0;
        bars.push(last);

        let series = PriceSeries::new("BHP".into(), bars);
        let kdj = compute_chart_indicators(&series).unwrap().kdj;

        assert!(kdj.k.values[15].valid);
        assert!(!kdj.k.values[16].valid);
        assert!(!kdj.d.values[16].valid);
        assert!(!kdj.j.values[16].valid);
        assert!(kdj.k.values[17].valid);

        // rsv17 = 100 * (104 - 95) / (105 - 95)
        let rsv17 = 90.0;
        let resumed = rsv17 / 3.0 + 2.0 * kdj.k.values[15].value / 3.0;
        assert_relative_eq!(kdj.k.values[17].value, resumed, epsilon = 1e-9);

        let reset = rsv17 / 3.0 + 2.0 * 50.0 / 3.0;
        assert!(
            (kdj.k.values[17].value - reset).abs() > 1e-6,
            "recursion must not restart from the seed after a gap"
        );

        let resumed_d = kdj.k.values[17].value / 3.0 + 2.0 * kdj.d.values[15].value / 3.0;
        assert_relative_eq!(kdj.d.values[17].value, resumed_d, epsilon = 1e-9);
    }

    #[test]
    fn empty_fetch_yields_empty_columns() {
        use tickchart::ports::price_port::PricePort;

        let port = MockPricePort::new();
        let series = port
            .fetch_daily("GHOST", date(2024, 1, 1), date(2024, 2, 1))
            .unwrap();
        let indicators = compute_chart_indicators(&series).unwrap();
        assert_eq!(indicators.bar_count(), 0);
    }

    #[test]
    fn unordered_bars_are_rejected_before_computation() {
        let mut bars = daily_bars("BHP", date(2024, 1, 1), &[10.0, 11.0, 12.0]);
        bars.swap(0, 2);
        let series = PriceSeries::new("BHP".into(), bars);

        let err = compute_chart_indicators(&series).unwrap_err();
        assert!(matches!(err, TickchartError::MalformedSeries { .. }));
    }
}

mod movement_classifier {
    use super::*;

    #[test]
    fn bar_movement_labels() {
        let mut bar = daily_bar("BHP", date(2024, 1, 1), 100.0);
        bar.open = 99.0;
        assert_eq!(bar_movement(&bar), Movement::Up);
        bar.open = 101.0;
        assert_eq!(bar_movement(&bar), Movement::Down);
        bar.open = 100.0;
        assert_eq!(bar_movement(&bar), Movement::Flat);
    }

    proptest! {
        #[test]
        fn classify_self_is_flat(a in -1e12f64..1e12f64) {
            prop_assert_eq!(Movement::classify(a, a), Movement::Flat);
        }

        #[test]
        fn classify_is_antisymmetric(a in -1e12f64..1e12f64, b in -1e12f64..1e12f64) {
            let forward = Movement::classify(a, b);
            let backward = Movement::classify(b, a);
            match forward {
                Movement::Up => prop_assert_eq!(backward, Movement::Down),
                Movement::Down => prop_assert_eq!(backward, Movement::Up),
                Movement::Flat => prop_assert_eq!(backward, Movement::Flat),
            }
        }

        #[test]
        fn histogram_sign_matches_label(h in -100.0f64..100.0) {
            let label = Movement::classify(h, 0.0);
            if h > 0.0 {
                prop_assert_eq!(label, Movement::Up);
            } else if h < 0.0 {
                prop_assert_eq!(label, Movement::Down);
            } else {
                prop_assert_eq!(label, Movement::Flat);
            }
        }
    }
}
