use chainseries_demos::common::{DemoCache, engine_builder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cache = DemoCache::open()?;
    let engine = engine_builder(&cache).build()?;

    let Some(ds) = engine.get_price_series(true, true).await else {
        println!("price data unavailable");
        return Ok(());
    };

    println!("source: {}", ds.source.as_str());
    if let (Some(first), Some(last)) = (ds.series.first(), ds.series.last()) {
        println!(
            "{} daily closes from {} to {}; latest {:.2} USD",
            ds.series.len(),
            first.date(),
            last.date(),
            last.value
        );
    }
    for (connector, span) in &ds.attribution.spans {
        println!("  {connector}: {} ..= {}", span.start, span.end);
    }
    if !ds.unfilled_gaps.is_empty() {
        println!("{} gaps could not be filled", ds.unfilled_gaps.len());
    }
    println!(
        "cache age: {:.2} h",
        engine.cache().age_hours(chainseries_core::Metric::Price)
    );
    Ok(())
}
