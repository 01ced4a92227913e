use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::{FileStore, MemStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(FileStore::new(&config.data_dir, config.simulated_latency_ms).await?)
            as Arc<dyn Store>;
        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// State backed by an in-memory store, for tests.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: String::new(),
            simulated_latency_ms: 0,
        });
        Self::from_parts(Arc::new(MemStore::new()), config)
    }
}
