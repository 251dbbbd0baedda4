use chainseries_core::{Metric, moving_average, snapshot, summarize};
use chainseries_demos::common::{DemoCache, engine_builder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cache = DemoCache::open()?;
    let engine = engine_builder(&cache).build()?;
    let Some(ds) = engine.get_series(Metric::Price, true, true).await else {
        println!("price data unavailable");
        return Ok(());
    };

    let last_year = match ds.series.last() {
        Some(p) => ds.series.between(p.date() - chrono::Days::new(365), p.date()),
        None => ds.series.clone(),
    };

    if let Some(s) = summarize(&last_year) {
        println!("last {} days ({} ..= {})", s.count, s.first_date, s.last_date);
        println!("  mean {:.2}  median {:.2}  min {:.2}  max {:.2}", s.mean, s.median, s.min, s.max);
        println!(
            "  volatility {:.2}%  max drawdown {:.2}%  sharpe {:.2}",
            s.volatility_pct, s.max_drawdown_pct, s.sharpe_ratio
        );
    }

    if let Some(snap) = snapshot(&ds.series, 200) {
        let pct = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.2}%"));
        println!("current {:.2}", snap.current);
        println!("  vs 200d MA {:.2}: {}", snap.moving_average, pct(snap.vs_moving_average_pct));
        println!("  vs ATH {:.2}: {}", snap.all_time_high, pct(snap.vs_all_time_high_pct));
        println!("  vs median {:.2}: {}", snap.median, pct(snap.vs_median_pct));
    }

    let ma30 = moving_average(&last_year, 30);
    if let Some(p) = ma30.last() {
        println!("30d MA on {}: {:.2}", p.date(), p.value);
    }
    Ok(())
}
