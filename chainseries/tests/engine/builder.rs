use chainseries::{SeriesEngine, SeriesError};
use chainseries_mock::MockConnector;
use std::sync::Arc;

use crate::helpers::{builder, d, tempdir};

#[test]
fn build_requires_a_connector() {
    let err = SeriesEngine::builder().build().err().unwrap();
    assert!(matches!(err, SeriesError::InvalidArg(_)));
}

#[test]
fn build_rejects_negative_tolerance() {
    let dir = tempdir();
    let err = builder(&dir, d(2024, 1, 1))
        .with_connector(Arc::new(MockConnector::new()))
        .gap_tolerance_days(-1)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, SeriesError::InvalidArg(_)));
}

#[test]
fn defaults_follow_engine_config() {
    let engine = SeriesEngine::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();
    let cfg = engine.config();
    assert_eq!(cfg.gap_tolerance_days, 1);
    assert_eq!(cfg.cache_validity, std::time::Duration::from_secs(86_400));
    assert_eq!(cfg.provider_timeout, std::time::Duration::from_secs(30));
    assert_eq!(cfg.bootstrap_start, d(2014, 9, 17));
    assert_eq!(engine.cache().dir(), std::path::Path::new("data"));
}
