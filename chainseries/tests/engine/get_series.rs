use chainseries::DataSource;
use chainseries_core::{Capability, Metric, SeriesError};
use chainseries_mock::MockBehavior;

use crate::helpers::{age_file, builder, d, dynamic, run, tempdir, tick};

#[tokio::test]
async fn total_failure_returns_none() {
    let dir = tempdir();
    let (c, ctl) = dynamic("down");
    ctl.set_full_history_behavior(
        Metric::Price,
        MockBehavior::Fail(SeriesError::connector("down", "boom")),
    )
    .await;
    ctl.set_range_behavior(
        Metric::Price,
        MockBehavior::Return(chainseries_core::TimeSeries::empty(Metric::Price)),
    )
    .await;
    ctl.set_live_behavior(
        Metric::Price,
        MockBehavior::Fail(SeriesError::connector("down", "boom")),
    )
    .await;

    let engine = builder(&dir, d(2024, 6, 11)).with_connector(c).build().unwrap();
    assert!(engine.get_series(Metric::Price, true, true).await.is_none());
    assert!(!engine.cache().path_for(Metric::Price).exists());
    assert!(matches!(
        engine.refresh(Metric::Price).await,
        Err(SeriesError::NotFound { .. })
    ));
}

#[tokio::test]
async fn end_to_end_refresh_appends_live_point() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("feed");
    ctl.set_live_behavior(Metric::Price, MockBehavior::Return(tick(today, 65_000.0)))
        .await;

    let engine = builder(&dir, today).with_connector(c).build().unwrap();
    assert!(engine.cache().write(&run(Metric::Price, d(2024, 6, 1), 10, 60_000.0)));

    let out = engine.get_series(Metric::Price, true, true).await.unwrap();
    assert_eq!(out.source, DataSource::Live);
    assert_eq!(out.series.len(), 11);
    let last = out.series.last().unwrap();
    assert_eq!(last.date(), today);
    assert_eq!(last.value, 65_000.0);
    assert!(out.unfilled_gaps.is_empty());
    assert_eq!(ctl.call_count(Capability::Range).await, 0);

    let body = std::fs::read_to_string(engine.cache().path_for(Metric::Price)).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "date,price");
    assert_eq!(lines.len(), 12);
    assert_eq!(lines[11], "2024-06-11,65000");
}

#[tokio::test]
async fn stale_cache_survives_network_failure() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("down");
    let fail = || MockBehavior::Fail(SeriesError::connector("down", "unreachable"));
    ctl.set_range_behavior(Metric::Price, fail()).await;
    ctl.set_full_history_behavior(Metric::Price, fail()).await;
    ctl.set_live_behavior(Metric::Price, MockBehavior::Fail(SeriesError::connector("down", "unreachable")))
        .await;

    let engine = builder(&dir, today).with_connector(c).build().unwrap();
    let cached = run(Metric::Price, d(2024, 6, 1), 10, 60_000.0);
    engine.cache().write(&cached);
    let path = engine.cache().path_for(Metric::Price);
    age_file(&path, 48);
    assert!(!engine.cache().is_fresh(Metric::Price, engine.config().cache_validity));

    let out = engine.get_series(Metric::Price, true, true).await.unwrap();
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(out.series, cached);
    assert!(!out.warnings.is_empty());
    // nothing contributed, so the stale file is not touched
    assert!(engine.cache().age_hours(Metric::Price) > 47.0);
}

#[tokio::test]
async fn fresh_gap_free_cache_short_circuits() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("unused");
    let engine = builder(&dir, today).with_connector(c).build().unwrap();
    let cached = run(Metric::Price, d(2024, 6, 1), 10, 1.0);
    engine.cache().write(&cached);

    let out = engine.get_series(Metric::Price, false, true).await.unwrap();
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(out.series, cached);
    assert!(ctl.calls().await.is_empty());
}

#[tokio::test]
async fn bootstrap_prefers_full_history_and_persists() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("bulk");
    let history = run(Metric::Price, d(2024, 6, 1), 10, 100.0);
    ctl.set_full_history_behavior(Metric::Price, MockBehavior::Return(history.clone()))
        .await;

    let engine = builder(&dir, today).with_connector(c).build().unwrap();
    let out = engine.get_series(Metric::Price, false, true).await.unwrap();
    assert_eq!(out.source, DataSource::Live);
    assert_eq!(out.series, history);
    assert_eq!(out.attribution.spans.len(), 1);
    assert_eq!(out.attribution.spans[0].0, "bulk");
    assert_eq!(engine.cache().read(Metric::Price), Some(history));
}

#[tokio::test]
async fn bootstrap_falls_back_to_range_providers() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("ranged");
    ctl.set_range_behavior(
        Metric::HashRate,
        MockBehavior::Return(run(Metric::HashRate, d(2024, 6, 1), 10, 600.0)),
    )
    .await;

    let engine = builder(&dir, today).with_connector(c).build().unwrap();
    let out = engine.get_series(Metric::HashRate, false, false).await.unwrap();
    assert_eq!(out.series.len(), 10);

    let calls = ctl.calls().await;
    let range_call = calls
        .iter()
        .find(|c| c.capability == Capability::Range)
        .unwrap();
    assert_eq!(range_call.range, Some((engine.config().bootstrap_start, today)));
    assert!(
        engine
            .cache()
            .path_for(Metric::HashRate)
            .ends_with("on_chain/hash_rate_eh_cache.csv")
    );
}

#[tokio::test]
async fn sample_fallback_is_tagged() {
    let dir = tempdir();
    let (c, _ctl) = dynamic("empty");
    let sample = run(Metric::MvrvRatio, d(2024, 1, 1), 3, 1.5);
    let engine = builder(&dir, d(2024, 6, 11))
        .with_connector(c)
        .sample_fallback(sample.clone())
        .build()
        .unwrap();

    let out = engine.get_series(Metric::MvrvRatio, true, true).await.unwrap();
    assert_eq!(out.source, DataSource::SampleFallback);
    assert!(!out.is_real());
    assert_eq!(out.series, sample);
    // other metrics have no placeholder
    assert!(engine.get_series(Metric::Sopr, true, true).await.is_none());
}
