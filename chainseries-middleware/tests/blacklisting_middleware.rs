use std::sync::Arc;
use std::time::Duration;

use chainseries_core::{Metric, NaiveDate, SeriesConnector, SeriesError, TimeSeries};
use chainseries_middleware::BlacklistingMiddleware;
use chainseries_mock::{DynamicMockConnector, MockBehavior, fixtures};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn rate_limited() -> SeriesError {
    SeriesError::HttpStatus {
        connector: "dyn".into(),
        status: 429,
    }
}

#[tokio::test]
async fn rate_limit_triggers_blacklist() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_range_behavior(Metric::Price, MockBehavior::Fail(rate_limited()))
        .await;
    let wrapped: Arc<dyn SeriesConnector> =
        Arc::new(BlacklistingMiddleware::new(raw, Duration::from_secs(60)));
    let rp = wrapped.as_range_provider().expect("range capability present");

    let err1 = rp
        .fetch_range(Metric::Price, d(2024, 1, 1), d(2024, 1, 2))
        .await
        .expect_err("should rate limit");
    assert!(err1.is_rate_limited());

    let err2 = rp
        .fetch_range(Metric::Price, d(2024, 1, 1), d(2024, 1, 2))
        .await
        .expect_err("should be blacklisted after rate limit");
    assert!(matches!(err2, SeriesError::TemporarilyBlacklisted { .. }));
    // the blacklisted call never reached the upstream
    assert_eq!(controller.calls().await.len(), 1);
}

#[tokio::test]
async fn other_errors_do_not_blacklist() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_range_behavior(
            Metric::Price,
            MockBehavior::Fail(SeriesError::HttpStatus {
                connector: "dyn".into(),
                status: 503,
            }),
        )
        .await;
    let wrapped: Arc<dyn SeriesConnector> =
        Arc::new(BlacklistingMiddleware::new(raw, Duration::from_secs(60)));
    let rp = wrapped.as_range_provider().unwrap();

    for _ in 0..3 {
        let err = rp
            .fetch_range(Metric::Price, d(2024, 1, 1), d(2024, 1, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, SeriesError::HttpStatus { status: 503, .. }));
    }
    assert_eq!(controller.calls().await.len(), 3);
}

#[tokio::test]
async fn blacklist_expiry_allows_provider_again() {
    let (raw, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_full_history_behavior(Metric::Price, MockBehavior::Fail(rate_limited()))
        .await;
    let wrapped: Arc<dyn SeriesConnector> =
        Arc::new(BlacklistingMiddleware::new(raw, Duration::from_millis(50)));
    let fp = wrapped.as_full_history_provider().unwrap();

    let _ = fp.fetch_full_history(Metric::Price).await.unwrap_err();
    let err = fp.fetch_full_history(Metric::Price).await.unwrap_err();
    assert!(matches!(err, SeriesError::TemporarilyBlacklisted { .. }));

    let history: TimeSeries = fixtures::history(Metric::Price);
    controller
        .set_full_history_behavior(Metric::Price, MockBehavior::Return(history.clone()))
        .await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    let got = fp.fetch_full_history(Metric::Price).await.expect("recovered");
    assert_eq!(got, history);
}
