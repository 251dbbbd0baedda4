use chainseries_core::Metric;
use chainseries_demos::common::{DemoCache, engine_builder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cache = DemoCache::open()?;
    let engine = engine_builder(&cache).build()?;

    let end = engine.today();
    let start = end - chrono::Days::new(30);
    let metrics = [
        Metric::HashRate,
        Metric::Difficulty,
        Metric::ActiveAddresses,
        Metric::TransactionCount,
        Metric::MinerRevenue,
        Metric::NvtRatio,
    ];

    for (metric, series) in engine.fetch_metrics(&metrics, start, end).await {
        let metric = metric.to_string();
        match series.last() {
            Some(p) => println!(
                "{metric:>18}: {:>4} points, latest {:.2} on {}",
                series.len(),
                p.value,
                p.date()
            ),
            None => println!("{metric:>18}: no data"),
        }
    }
    Ok(())
}
