use std::sync::Arc;
use std::time::Duration;

use chainseries_connectors::GlassnodeConnector;
use chainseries_core::{Capability, Metric, SeriesConnector, ThrottleConfig};
use chainseries_demos::common::{DemoCache, engine_builder, use_mock};
use chainseries_middleware::ConnectorBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // In CI no key is configured, so the connector fails fast without any request.
    let key = if use_mock() {
        None
    } else {
        GlassnodeConnector::api_key_from_env()
    };
    let raw = Arc::new(GlassnodeConnector::new_raw_with_key(key));
    println!("api key configured: {}", raw.has_api_key());

    // 1) Compose the stack by hand: blacklist on 429, at most one request every 2s.
    let builder = ConnectorBuilder::new(raw)
        .with_throttle(ThrottleConfig {
            min_interval: Duration::from_secs(2),
        })
        .with_blacklist(chainseries_core::BlacklistConfig::default());
    for layer in &builder.to_stack().layers {
        println!("  layer {} {}", layer.name, layer.config);
    }
    let glassnode: Arc<dyn SeriesConnector> = builder.build();
    println!("outer connector identity: {}", glassnode.name());

    // 2) Prefer Glassnode for MVRV; other registered connectors remain as fallbacks.
    let cache = DemoCache::open()?;
    let engine = engine_builder(&cache)
        .with_connector(Arc::clone(&glassnode))
        .prefer_for_metric(Metric::MvrvRatio, Capability::Range, &[glassnode])
        .build()?;

    let end = engine.today();
    let start = end - chrono::Days::new(14);
    let ds = engine
        .fetch_metric_dataset(Metric::MvrvRatio, start, end)
        .await;
    match ds {
        Some(ds) => {
            println!("mvrv: {} points ({})", ds.series.len(), ds.source.as_str());
            for w in &ds.warnings {
                println!("  tolerated: {} ({})", w, w.reason());
            }
        }
        None => println!("mvrv unavailable"),
    }
    Ok(())
}
