use std::time::{Duration, Instant};

use chainseries::DataSource;
use chainseries_core::{Metric, SeriesError};
use chainseries_mock::MockBehavior;

use crate::helpers::{builder, d, dynamic, run, tempdir, tick};

#[tokio::test]
async fn hanging_provider_is_skipped_after_provider_timeout() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (slow, slow_ctl) = dynamic("slow");
    let (fast, fast_ctl) = dynamic("fast");
    slow_ctl.set_live_behavior(Metric::Price, MockBehavior::Hang).await;
    fast_ctl
        .set_live_behavior(Metric::Price, MockBehavior::Return(tick(today, 1.0)))
        .await;

    let engine = builder(&dir, today)
        .with_connector(slow)
        .with_connector(fast)
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    engine.cache().write(&run(Metric::Price, d(2024, 6, 1), 10, 1.0));

    let out = engine.get_series(Metric::Price, true, false).await.unwrap();
    assert_eq!(out.series.len(), 11);
    assert_eq!(out.attribution.spans[0].0, "fast");
    assert!(matches!(out.warnings[0], SeriesError::ProviderTimeout { .. }));
}

#[tokio::test]
async fn request_deadline_degrades_to_cache() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("slow");
    ctl.set_live_behavior(Metric::Price, MockBehavior::Hang).await;

    let engine = builder(&dir, today)
        .with_connector(c)
        .provider_timeout(Duration::from_secs(30))
        .request_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let cached = run(Metric::Price, d(2024, 6, 1), 10, 1.0);
    engine.cache().write(&cached);

    let started = Instant::now();
    let out = engine.get_series(Metric::Price, true, true).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(out.series, cached);
    assert_eq!(out.warnings, vec![SeriesError::request_timeout("series")]);
}
