use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// Key-value persistence boundary. Each key names one JSON document:
/// a whole collection (`users`, `tasks`) or a single record
/// (`session_token`, `session_user`).
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>>;
    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Decode a whole collection; a missing key reads as an empty collection.
pub async fn load_collection<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> anyhow::Result<Vec<T>> {
    match store.load(key).await? {
        Some(value) => {
            serde_json::from_value(value).with_context(|| format!("decode collection {key}"))
        }
        None => Ok(Vec::new()),
    }
}

pub async fn save_collection<T: Serialize>(
    store: &dyn Store,
    key: &str,
    items: &[T],
) -> anyhow::Result<()> {
    let value = serde_json::to_value(items).with_context(|| format!("encode collection {key}"))?;
    store.save(key, value).await
}

/// One JSON file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
    latency: Option<Duration>,
}

impl FileStore {
    /// `latency_ms > 0` adds an artificial delay to every operation,
    /// keeping the asynchronous contract visible to callers the way a
    /// network-backed store would.
    pub async fn new(dir: &str, latency_ms: u64) -> anyhow::Result<Self> {
        let dir = PathBuf::from(dir);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create data dir {}", dir.display()))?;
        Ok(Self {
            dir,
            latency: (latency_ms > 0).then(|| Duration::from_millis(latency_ms)),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn simulate_roundtrip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Store for FileStore {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
        self.simulate_roundtrip().await;
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("parse stored document {key}"))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read stored document {key}")),
        }
    }

    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.simulate_roundtrip().await;
        let bytes = serde_json::to_vec(&value).with_context(|| format!("encode {key}"))?;
        // Write-then-rename so a crashed write never truncates the document.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("write {key}"))?;
        tokio::fs::rename(&tmp, self.path_for(key))
            .await
            .with_context(|| format!("persist {key}"))?;
        debug!(key, bytes = bytes.len(), "document saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.simulate_roundtrip().await;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove stored document {key}")),
        }
    }
}

/// Ephemeral store for tests and throwaway runs.
#[derive(Default)]
pub struct MemStore {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.docs.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.docs.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.docs.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mem_store_round_trip() {
        let store = MemStore::new();
        assert!(store.load("users").await.unwrap().is_none());

        store.save("users", json!([{"id": 1}])).await.unwrap();
        assert_eq!(store.load("users").await.unwrap(), Some(json!([{"id": 1}])));

        store.remove("users").await.unwrap();
        assert!(store.load("users").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = MemStore::new();
        store.remove("session_token").await.unwrap();
        store.save("session_token", json!("abc")).await.unwrap();
        store.remove("session_token").await.unwrap();
        store.remove("session_token").await.unwrap();
        assert!(store.load("session_token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("taskflow-store-{}", uuid::Uuid::new_v4()));
        let dir_str = dir.to_str().unwrap().to_string();

        let store = FileStore::new(&dir_str, 0).await.unwrap();
        store
            .save("tasks", json!([{"text": "Buy milk"}]))
            .await
            .unwrap();
        assert_eq!(
            store.load("tasks").await.unwrap(),
            Some(json!([{"text": "Buy milk"}]))
        );

        // A fresh handle over the same directory sees the persisted data.
        let reopened = FileStore::new(&dir_str, 0).await.unwrap();
        assert_eq!(
            reopened.load("tasks").await.unwrap(),
            Some(json!([{"text": "Buy milk"}]))
        );

        reopened.remove("tasks").await.unwrap();
        assert!(reopened.load("tasks").await.unwrap().is_none());
        // Removing an absent key stays quiet.
        reopened.remove("tasks").await.unwrap();

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let store = MemStore::new();
        let users: Vec<serde_json::Value> = load_collection(&store, "users").await.unwrap();
        assert!(users.is_empty());
    }
}
