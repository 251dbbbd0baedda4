use chainseries_connectors::BinanceConnector;
use chainseries_core::{Metric, SeriesConnector, SeriesError};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn live_tick_comes_from_last_kline_close() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/klines")
                .query_param("symbol", "BTCUSDT")
                .query_param("interval", "1m")
                .query_param("limit", "60");
            then.status(200).json_body(json!([
                [1_710_000_000_000_i64, "64000", "64100", "63900", "64050.00", "12.5", 1_710_000_059_999_i64],
                [1_710_000_060_000_i64, "64050", "65100", "64000", "65000.00", "10.1", 1_710_000_119_999_i64]
            ]));
        })
        .await;

    let b = BinanceConnector::with_base_url(&server.base_url()).unwrap();
    let tick = b.as_live_provider().unwrap().fetch_live(Metric::Price).await.unwrap();
    m.assert_async().await;
    assert_eq!(tick.value, 65_000.0);
    assert_eq!(tick.ts.timestamp_millis(), 1_710_000_060_000);
}

#[tokio::test]
async fn non_price_metric_is_unsupported() {
    let b = BinanceConnector::new_raw();
    let err = b
        .as_live_provider()
        .unwrap()
        .fetch_live(Metric::HashRate)
        .await
        .unwrap_err();
    assert!(matches!(err, SeriesError::Unsupported { .. }));
}
