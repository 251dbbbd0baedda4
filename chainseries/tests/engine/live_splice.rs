use chainseries::DataSource;
use chainseries_core::{Metric, SeriesError};
use chainseries_mock::MockBehavior;

use crate::helpers::{builder, d, dynamic, run, tempdir, tick};

#[tokio::test]
async fn existing_today_point_is_replaced_not_duplicated() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("ticker");
    ctl.set_live_behavior(Metric::Price, MockBehavior::Return(tick(today, 70_000.0)))
        .await;
    let engine = builder(&dir, today).with_connector(c).build().unwrap();

    // Jun 2 ..= Jun 11, today included
    let base = run(Metric::Price, d(2024, 6, 2), 10, 60_000.0);
    engine.cache().write(&base);

    let out = engine.get_series(Metric::Price, true, false).await.unwrap();
    assert_eq!(out.series.len(), base.len());
    let last = out.series.last().unwrap();
    assert_eq!(last.date(), today);
    assert_eq!(last.ts, base.last().unwrap().ts);
    assert_eq!(last.value, 70_000.0);
    assert_eq!(
        &out.series.points()[..9],
        &base.points()[..9],
        "prior days must be unchanged"
    );
}

#[tokio::test]
async fn live_failure_keeps_series_and_reports_warning() {
    let dir = tempdir();
    let today = d(2024, 6, 11);
    let (c, ctl) = dynamic("ticker");
    ctl.set_live_behavior(
        Metric::Price,
        MockBehavior::Fail(SeriesError::HttpStatus {
            connector: "ticker".into(),
            status: 429,
        }),
    )
    .await;
    let engine = builder(&dir, today).with_connector(c).build().unwrap();
    let base = run(Metric::Price, d(2024, 6, 1), 10, 1.0);
    engine.cache().write(&base);

    let out = engine.get_series(Metric::Price, true, true).await.unwrap();
    assert_eq!(out.series, base);
    assert_eq!(out.source, DataSource::Cached);
    assert_eq!(out.warnings.len(), 1);
    assert!(
        out.warnings[0]
            .clone()
            .flatten()
            .iter()
            .any(SeriesError::is_rate_limited)
    );
}
