use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory the file store keeps its JSON documents in.
    pub data_dir: String,
    /// Artificial per-operation delay of the file store, in milliseconds.
    /// Zero disables it.
    pub simulated_latency_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            simulated_latency_ms: std::env::var("SIMULATED_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0),
        })
    }
}
