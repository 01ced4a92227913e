use crate::storage::{load_collection, save_collection, Store};
use crate::tasks::model::Task;

pub const TASKS_KEY: &str = "tasks";

/// The full task collection in stored order (newest-created first).
pub async fn load_all(store: &dyn Store) -> anyhow::Result<Vec<Task>> {
    load_collection(store, TASKS_KEY).await
}

pub async fn save_all(store: &dyn Store, tasks: &[Task]) -> anyhow::Result<()> {
    save_collection(store, TASKS_KEY, tasks).await
}
