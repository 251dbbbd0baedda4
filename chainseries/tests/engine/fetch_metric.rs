use chainseries::DataSource;
use chainseries_core::{Capability, Gap, Metric, SeriesError, TimeSeries};
use chainseries_mock::MockBehavior;

use crate::helpers::{age_file, builder, d, dynamic, run, tempdir};

#[tokio::test]
async fn fresh_cache_answers_without_upstream() {
    let dir = tempdir();
    let (c, ctl) = dynamic("chain");
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    engine.cache().write(&run(Metric::HashRate, d(2024, 6, 1), 10, 600.0));

    let s = engine
        .fetch_metric(Metric::HashRate, d(2024, 6, 3), d(2024, 6, 5))
        .await;
    assert_eq!(s.len(), 3);
    assert_eq!(s.value_on(d(2024, 6, 3)), Some(602.0));
    assert!(ctl.calls().await.is_empty());
}

#[tokio::test]
async fn stale_cache_is_refreshed_and_merged() {
    let dir = tempdir();
    let (c, ctl) = dynamic("chain");
    ctl.set_range_behavior(
        Metric::ActiveAddresses,
        MockBehavior::Return(run(Metric::ActiveAddresses, d(2024, 6, 5), 5, 900.0)),
    )
    .await;
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    engine
        .cache()
        .write(&run(Metric::ActiveAddresses, d(2024, 6, 1), 6, 100.0));
    age_file(&engine.cache().path_for(Metric::ActiveAddresses), 30);

    let out = engine
        .fetch_metric_dataset(Metric::ActiveAddresses, d(2024, 6, 5), d(2024, 6, 9))
        .await
        .unwrap();
    assert_eq!(out.source, DataSource::Live);
    assert_eq!(out.series.len(), 5);
    assert_eq!(out.series.value_on(d(2024, 6, 5)), Some(900.0));

    // older cached days survive; overlapping days take the fresh values
    let cached = engine.cache().read(Metric::ActiveAddresses).unwrap();
    assert_eq!(cached.len(), 9);
    assert_eq!(cached.value_on(d(2024, 6, 1)), Some(100.0));
    assert_eq!(cached.value_on(d(2024, 6, 6)), Some(901.0));
    assert!(engine.cache().is_fresh(Metric::ActiveAddresses, engine.config().cache_validity));
}

#[tokio::test]
async fn upstream_failure_falls_back_to_stale_cache() {
    let dir = tempdir();
    let (c, ctl) = dynamic("chain");
    ctl.set_range_behavior(
        Metric::Sopr,
        MockBehavior::Fail(SeriesError::MissingApiKey {
            connector: "chain".into(),
        }),
    )
    .await;
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    engine.cache().write(&run(Metric::Sopr, d(2024, 6, 1), 10, 1.0));
    age_file(&engine.cache().path_for(Metric::Sopr), 72);

    let out = engine
        .fetch_metric_dataset(Metric::Sopr, d(2024, 6, 8), d(2024, 6, 30))
        .await
        .unwrap();
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(out.series.len(), 3);
    assert_eq!(out.warnings.len(), 1);
}

#[tokio::test]
async fn nothing_available_is_an_empty_series() {
    let dir = tempdir();
    let (c, _ctl) = dynamic("chain");
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    let s = engine
        .fetch_metric(Metric::MinerRevenue, d(2024, 6, 1), d(2024, 6, 10))
        .await;
    assert!(s.is_empty());
    assert_eq!(s.metric(), Metric::MinerRevenue);
}

#[tokio::test]
async fn reversed_range_makes_no_calls() {
    let dir = tempdir();
    let (c, ctl) = dynamic("chain");
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    let s = engine
        .fetch_metric(Metric::HashRate, d(2024, 6, 10), d(2024, 6, 1))
        .await;
    assert!(s.is_empty());
    assert_eq!(ctl.call_count(Capability::Range).await, 0);
}

#[tokio::test]
async fn several_metrics_fetch_concurrently() {
    let dir = tempdir();
    let (c, ctl) = dynamic("chain");
    for (metric, base) in [(Metric::Difficulty, 8.0e13), (Metric::TransactionCount, 4.0e5)] {
        ctl.set_range_behavior(metric, MockBehavior::Return(run(metric, d(2024, 6, 1), 10, base)))
            .await;
    }
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();

    let out = engine
        .fetch_metrics(
            &[Metric::Difficulty, Metric::TransactionCount, Metric::LthSupply],
            d(2024, 6, 1),
            d(2024, 6, 10),
        )
        .await;
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].0, Metric::Difficulty);
    assert_eq!(out[0].1.len(), 10);
    assert_eq!(out[1].1.len(), 10);
    assert!(out[2].1.is_empty());
}

#[tokio::test]
async fn holes_inside_the_range_are_reported() {
    let dir = tempdir();
    let (c, ctl) = dynamic("chain");
    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    let holed = TimeSeries::from_daily(
        Metric::HashRate,
        [1, 2, 5, 6, 7, 8, 9, 10].map(|day| (d(2024, 6, day), 600.0)),
    );
    engine.cache().write(&holed);

    let out = engine
        .fetch_metric_dataset(Metric::HashRate, d(2024, 6, 1), d(2024, 6, 8))
        .await
        .unwrap();
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(
        out.unfilled_gaps,
        vec![Gap {
            start: d(2024, 6, 3),
            end: d(2024, 6, 4)
        }]
    );

    // days before the first cached point are not a gap
    let short = engine
        .fetch_metric_dataset(Metric::HashRate, d(2024, 5, 20), d(2024, 6, 1))
        .await
        .unwrap();
    assert!(short.unfilled_gaps.is_empty());

    // a missing tail runs to the range end, not to yesterday
    engine.cache().write(&run(Metric::HashRate, d(2024, 6, 1), 3, 600.0));
    let tail = engine
        .fetch_metric_dataset(Metric::HashRate, d(2024, 6, 1), d(2024, 6, 8))
        .await
        .unwrap();
    assert_eq!(
        tail.unfilled_gaps,
        vec![Gap {
            start: d(2024, 6, 4),
            end: d(2024, 6, 8)
        }]
    );
    assert!(ctl.calls().await.is_empty());
}
