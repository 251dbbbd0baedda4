use chainseries_connectors::CryptoDataDownloadConnector;
use chainseries_core::{Metric, NaiveDate, SeriesConnector};
use httpmock::prelude::*;

#[tokio::test]
async fn full_history_parses_bitstamp_csv() {
    let body = "https://www.CryptoDataDownload.com\n\
                unix,date,symbol,open,high,low,close,Volume BTC,Volume USD\n\
                1704153600,2024-01-02,BTC/USD,44000,45500,43800,45000,100,4500000\n\
                1704067200,2024-01-01,BTC/USD,42500,44200,42300,44000,120,5280000\n";
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/cdd/Bitstamp_BTCUSD_d.csv");
            then.status(200).header("content-type", "text/csv").body(body);
        })
        .await;

    let c = CryptoDataDownloadConnector::with_base_url(&server.base_url()).unwrap();
    let s = c
        .as_full_history_provider()
        .unwrap()
        .fetch_full_history(Metric::Price)
        .await
        .unwrap();
    m.assert_async().await;
    // file is newest-first; the series is chronological
    assert_eq!(s.first().unwrap().date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(s.last().unwrap().value, 45_000.0);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cdd/Bitstamp_BTCUSD_d.csv");
            then.status(503);
        })
        .await;
    let c = CryptoDataDownloadConnector::with_base_url(&server.base_url()).unwrap();
    let err = c
        .as_full_history_provider()
        .unwrap()
        .fetch_full_history(Metric::Price)
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "http-status");
    assert!(!err.is_rate_limited());
}
