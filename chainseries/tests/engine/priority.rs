use chainseries_core::{Capability, Metric, SeriesError, TimeSeries};
use chainseries_mock::MockBehavior;

use crate::helpers::{builder, d, dynamic, tempdir};

fn one_day(value: f64) -> TimeSeries {
    TimeSeries::from_daily(Metric::Price, [(d(2024, 1, 3), value)])
}

fn hole() -> TimeSeries {
    TimeSeries::from_daily(Metric::Price, [(d(2024, 1, 1), 1.0), (d(2024, 1, 4), 4.0)])
}

#[tokio::test]
async fn default_price_chain_prefers_coingecko_then_yahoo() {
    let dir = tempdir();
    let (yahoo, y) = dynamic("yahoo");
    let (coingecko, cg) = dynamic("coingecko");
    y.set_range_behavior(Metric::Price, MockBehavior::Return(one_day(20.0)))
        .await;
    cg.set_range_behavior(Metric::Price, MockBehavior::Return(one_day(10.0)))
        .await;

    // registration order is yahoo first; the default priority overrides it
    let engine = builder(&dir, d(2024, 1, 5))
        .with_connector(yahoo)
        .with_connector(coingecko)
        .build()
        .unwrap();
    let s = hole();
    let r = engine.fill_gaps(&s, &engine.detect_gaps(&s)).await;
    assert_eq!(r.series.value_on(d(2024, 1, 3)), Some(10.0));
    assert_eq!(r.attribution.spans[0].0, "coingecko");
    assert_eq!(y.call_count(Capability::Range).await, 0);
}

#[tokio::test]
async fn secondary_source_fills_when_primary_fails() {
    let dir = tempdir();
    let (primary, p) = dynamic("primary");
    let (secondary, s_ctl) = dynamic("secondary");
    p.set_range_behavior(
        Metric::Price,
        MockBehavior::Fail(SeriesError::Connect {
            connector: "primary".into(),
            msg: "refused".into(),
        }),
    )
    .await;
    s_ctl
        .set_range_behavior(Metric::Price, MockBehavior::Return(one_day(33.0)))
        .await;

    let engine = builder(&dir, d(2024, 1, 5))
        .with_connector(secondary.clone())
        .with_connector(primary.clone())
        .prefer_for_metric(Metric::Price, Capability::Range, &[primary, secondary])
        .build()
        .unwrap();
    let s = hole();
    let r = engine.fill_gaps(&s, &engine.detect_gaps(&s)).await;
    assert_eq!(r.series.value_on(d(2024, 1, 3)), Some(33.0));
    assert_eq!(r.attribution.spans[0].0, "secondary");
    assert_eq!(p.call_count(Capability::Range).await, 1);
    // the primary's failure is reported but does not block the fill
    assert_eq!(r.warnings.len(), 1);
    assert_eq!(r.warnings[0].reason(), "connect");
}

#[tokio::test]
async fn empty_answer_moves_to_next_provider() {
    let dir = tempdir();
    let (a, a_ctl) = dynamic("a");
    let (b, b_ctl) = dynamic("b");
    a_ctl
        .set_range_behavior(Metric::Price, MockBehavior::Return(TimeSeries::empty(Metric::Price)))
        .await;
    b_ctl
        .set_range_behavior(Metric::Price, MockBehavior::Return(one_day(7.0)))
        .await;

    let engine = builder(&dir, d(2024, 1, 5))
        .with_connector(a)
        .with_connector(b)
        .build()
        .unwrap();
    let s = hole();
    let r = engine.fill_gaps(&s, &engine.detect_gaps(&s)).await;
    assert_eq!(r.series.value_on(d(2024, 1, 3)), Some(7.0));
    assert_eq!(b_ctl.call_count(Capability::Range).await, 1);
}
