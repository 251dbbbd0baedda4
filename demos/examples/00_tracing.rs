use chainseries_core::Metric;
use chainseries_demos::common::{DemoCache, engine_builder};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,chainseries=debug,chainseries_connectors=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let cache = DemoCache::open()?;
    let engine = engine_builder(&cache).build()?;

    // Bootstrap or refresh, fill gaps, splice today's tick.
    let price = engine.refresh(Metric::Price).await?;
    println!(
        "price: {} points ({}), {} warnings",
        price.series.len(),
        price.source.as_str(),
        price.warnings.len()
    );

    // A second call within the validity window is served from disk.
    let again = engine.get_price_series(false, true).await;
    if let Some(ds) = again {
        println!("second call source: {}", ds.source.as_str());
    }
    Ok(())
}
