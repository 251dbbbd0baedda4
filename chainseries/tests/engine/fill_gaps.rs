use chainseries::DataSource;
use chainseries_core::{Capability, Gap, Metric, SeriesError, TimeSeries};
use chainseries_mock::MockBehavior;

use crate::helpers::{builder, d, dynamic, tempdir};

fn with_hole() -> TimeSeries {
    TimeSeries::from_daily(
        Metric::Price,
        [
            (d(2024, 1, 1), 1.0),
            (d(2024, 1, 2), 2.0),
            (d(2024, 1, 4), 4.0),
        ],
    )
}

#[tokio::test]
async fn boundary_gap_is_detected_and_filled() {
    let dir = tempdir();
    let (c, ctl) = dynamic("filler");
    ctl.set_range_behavior(
        Metric::Price,
        MockBehavior::Return(TimeSeries::from_daily(
            Metric::Price,
            [(d(2024, 1, 2), 99.0), (d(2024, 1, 3), 3.0)],
        )),
    )
    .await;
    let engine = builder(&dir, d(2024, 1, 5)).with_connector(c).build().unwrap();

    let s = with_hole();
    let gaps = engine.detect_gaps(&s);
    assert_eq!(
        gaps,
        vec![Gap {
            start: d(2024, 1, 3),
            end: d(2024, 1, 3)
        }]
    );

    let r = engine.fill_gaps(&s, &gaps).await;
    assert_eq!(r.series.len(), 4);
    assert_eq!(r.series.value_on(d(2024, 1, 3)), Some(3.0));
    // the fill is clipped to the gap, so existing days are untouched
    assert_eq!(r.series.value_on(d(2024, 1, 2)), Some(2.0));
    assert_eq!(r.attribution.spans.len(), 1);
    assert!(engine.detect_gaps(&r.series).is_empty());

    let calls = ctl.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].range, Some((d(2024, 1, 3), d(2024, 1, 3))));
}

#[tokio::test]
async fn wider_tolerance_ignores_single_missing_day() {
    let dir = tempdir();
    let (c, _ctl) = dynamic("filler");
    let engine = builder(&dir, d(2024, 1, 5))
        .with_connector(c)
        .gap_tolerance_days(2)
        .build()
        .unwrap();
    assert!(engine.detect_gaps(&with_hole()).is_empty());
}

#[tokio::test]
async fn unfillable_gap_is_a_stable_fixed_point() {
    let dir = tempdir();
    let (c, ctl) = dynamic("down");
    ctl.set_range_behavior(
        Metric::Price,
        MockBehavior::Fail(SeriesError::connector("down", "503")),
    )
    .await;
    let engine = builder(&dir, d(2024, 1, 5)).with_connector(c).build().unwrap();

    let s = with_hole();
    let gaps = engine.detect_gaps(&s);
    let first = engine.fill_gaps(&s, &gaps).await;
    assert_eq!(first.series, s);
    assert_eq!(first.warnings.len(), 1);
    assert!(first.attribution.is_empty());

    let again = engine.detect_gaps(&first.series);
    assert_eq!(again, gaps);
    let second = engine.fill_gaps(&first.series, &again).await;
    assert_eq!(second.series, first.series);
    assert_eq!(ctl.call_count(Capability::Range).await, 2);
}

#[tokio::test]
async fn filling_a_complete_series_is_a_no_op() {
    let dir = tempdir();
    let (c, ctl) = dynamic("filler");
    let engine = builder(&dir, d(2024, 1, 5)).with_connector(c).build().unwrap();
    let s = TimeSeries::from_daily(
        Metric::Price,
        (1..=4).map(|day| (d(2024, 1, day), f64::from(day))),
    );
    let r = engine.fill_gaps(&s, &engine.detect_gaps(&s)).await;
    assert_eq!(r.series, s);
    assert!(ctl.calls().await.is_empty());
}

#[tokio::test]
async fn trailing_and_interior_gaps_fill_in_order() {
    let dir = tempdir();
    let (c, ctl) = dynamic("filler");
    ctl.set_range_behavior(
        Metric::Price,
        MockBehavior::Return(TimeSeries::from_daily(
            Metric::Price,
            (1..=10).map(|day| (d(2024, 1, day), 50.0)),
        )),
    )
    .await;
    let engine = builder(&dir, d(2024, 1, 10)).with_connector(c).build().unwrap();
    engine.cache().write(&with_hole());

    let out = engine.get_series(Metric::Price, false, true).await.unwrap();
    assert_eq!(out.source, DataSource::Live);
    // Jan 3 plus Jan 5..=9; today is not a gap
    assert_eq!(out.series.len(), 9);
    assert!(out.unfilled_gaps.is_empty());

    let ranges: Vec<_> = ctl.calls().await.into_iter().filter_map(|c| c.range).collect();
    assert_eq!(
        ranges,
        vec![(d(2024, 1, 3), d(2024, 1, 3)), (d(2024, 1, 5), d(2024, 1, 9))]
    );
    assert_eq!(engine.cache().read(Metric::Price).unwrap().len(), 9);
}

fn difficulty_epochs(skip: Option<u64>) -> TimeSeries {
    TimeSeries::from_daily(
        Metric::Difficulty,
        (0..10)
            .filter(|i| Some(*i) != skip)
            .map(|i| (d(2024, 1, 1) + chrono::Days::new(i * 14), 80e12 + i as f64)),
    )
}

#[tokio::test]
async fn retarget_cadence_settles_without_upstream_calls() {
    let dir = tempdir();
    let (c, ctl) = dynamic("mempool");
    let epochs = difficulty_epochs(None);
    ctl.set_range_behavior(Metric::Difficulty, MockBehavior::Return(epochs.clone()))
        .await;
    // last epoch is May 6; yesterday is May 19
    let engine = builder(&dir, d(2024, 5, 20)).with_connector(c).build().unwrap();
    engine.cache().write(&epochs);

    assert!(engine.detect_gaps(&epochs).is_empty());
    for _ in 0..2 {
        let out = engine.get_series(Metric::Difficulty, false, true).await.unwrap();
        assert_eq!(out.source, DataSource::Cached);
        assert!(out.unfilled_gaps.is_empty());
        assert_eq!(out.series, epochs);
    }
    assert!(ctl.calls().await.is_empty());
}

#[tokio::test]
async fn missed_retarget_is_still_a_gap() {
    let dir = tempdir();
    let (c, _ctl) = dynamic("mempool");
    let engine = builder(&dir, d(2024, 5, 20)).with_connector(c).build().unwrap();

    // epoch 5 (Mar 11) is missing, leaving 28 days between Feb 26 and Mar 25
    let gaps = engine.detect_gaps(&difficulty_epochs(Some(5)));
    assert_eq!(
        gaps,
        vec![Gap {
            start: d(2024, 2, 27),
            end: d(2024, 3, 24)
        }]
    );
}

#[tokio::test]
async fn single_point_cache_has_no_trailing_gap() {
    let dir = tempdir();
    let (c, ctl) = dynamic("filler");
    let engine = builder(&dir, d(2024, 4, 1)).with_connector(c).build().unwrap();
    let one = TimeSeries::from_daily(Metric::Price, [(d(2024, 1, 1), 42_000.0)]);
    engine.cache().write(&one);

    assert!(engine.detect_gaps(&one).is_empty());
    let out = engine.get_series(Metric::Price, false, true).await.unwrap();
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(out.series, one);
    assert!(out.unfilled_gaps.is_empty());
    assert!(ctl.calls().await.is_empty());
}
