use std::path::{Path, PathBuf};
use std::sync::Arc;

use chainseries::{SeriesEngine, SeriesEngineBuilder};
use chainseries_core::SeriesConnector;
use tempfile::TempDir;

/// Set to run every demo against the fixture connector instead of the network.
pub const USE_MOCK_ENV: &str = "CHAINSERIES_DEMOS_USE_MOCK";

/// Whether demos should avoid the network.
#[must_use]
pub fn use_mock() -> bool {
    std::env::var_os(USE_MOCK_ENV).is_some()
}

/// Connectors for demos: the fixture mock in CI, the public upstreams otherwise.
#[must_use]
pub fn get_connectors() -> Vec<Arc<dyn SeriesConnector>> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        vec![Arc::new(chainseries_mock::MockConnector::new())]
    } else {
        chainseries_connectors::default_connectors()
    }
}

/// Cache directory for a demo run.
///
/// Mock runs get a scratch directory that is removed when this value drops,
/// so they never touch real cached data. Keep it alive for as long as the
/// engine built from it.
pub struct DemoCache {
    path: PathBuf,
    _scratch: Option<TempDir>,
}

impl DemoCache {
    /// Scratch directory in mock mode, `data/` otherwise.
    ///
    /// # Errors
    /// Fails when the scratch directory cannot be created.
    pub fn open() -> std::io::Result<Self> {
        if use_mock() {
            Self::scratch()
        } else {
            Ok(Self {
                path: PathBuf::from("data"),
                _scratch: None,
            })
        }
    }

    fn scratch() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("chainseries-demos-").tempdir()?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            _scratch: Some(dir),
        })
    }

    /// Directory handed to the engine.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Engine builder preloaded with the demo connectors and `cache`.
#[must_use]
pub fn engine_builder(cache: &DemoCache) -> SeriesEngineBuilder {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    SeriesEngine::builder()
        .with_connectors(get_connectors())
        .cache_dir(cache.path())
}
