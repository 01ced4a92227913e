use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Error;
use crate::storage::Store;
use crate::tasks::model::{Task, TaskDraft, TaskPatch};
use crate::tasks::repo;

fn normalize_label(label: Option<String>) -> Option<String> {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

/// All tasks, newest-created first.
pub async fn list(store: &dyn Store) -> Result<Vec<Task>, Error> {
    Ok(repo::load_all(store).await?)
}

pub async fn get(store: &dyn Store, id: Uuid) -> Result<Task, Error> {
    repo::load_all(store)
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or(Error::NotFound("Task"))
}

/// Create a task from a draft. The service owns identity and timestamps;
/// drafts never carry them.
pub async fn create(store: &dyn Store, draft: TaskDraft) -> Result<Task, Error> {
    let text = draft.text.trim().to_string();
    if text.is_empty() {
        return Err(Error::Validation("Task text is required".into()));
    }

    let now = OffsetDateTime::now_utc();
    let task = Task {
        id: Uuid::new_v4(),
        text,
        completed: false,
        important: draft.important,
        priority: draft.priority,
        due_date: draft.due_date,
        category: normalize_label(draft.category),
        assigned_to: normalize_label(draft.assigned_to),
        created_at: now,
        updated_at: now,
    };

    let mut tasks = repo::load_all(store).await?;
    tasks.insert(0, task.clone());
    repo::save_all(store, &tasks).await?;

    info!(task_id = %task.id, "task created");
    Ok(task)
}

/// Merge a patch onto an existing task, field by field, patch side
/// winning. `id` and `created_at` are immutable; `updated_at` is
/// refreshed on success.
pub async fn update(store: &dyn Store, id: Uuid, patch: TaskPatch) -> Result<Task, Error> {
    if let Some(text) = &patch.text {
        if text.trim().is_empty() {
            return Err(Error::Validation("Task text is required".into()));
        }
    }

    let mut tasks = repo::load_all(store).await?;
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(Error::NotFound("Task"))?;

    if let Some(text) = patch.text {
        task.text = text.trim().to_string();
    }
    if let Some(completed) = patch.completed {
        task.completed = completed;
    }
    if let Some(important) = patch.important {
        task.important = important;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
    if let Some(category) = patch.category {
        task.category = normalize_label(category);
    }
    if let Some(assigned_to) = patch.assigned_to {
        task.assigned_to = normalize_label(assigned_to);
    }
    task.updated_at = OffsetDateTime::now_utc();

    let updated = task.clone();
    repo::save_all(store, &tasks).await?;

    debug!(task_id = %id, "task updated");
    Ok(updated)
}

/// Remove a task. Deleting an unknown (or already deleted) id fails.
pub async fn delete(store: &dyn Store, id: Uuid) -> Result<(), Error> {
    let mut tasks = repo::load_all(store).await?;
    let before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() == before {
        return Err(Error::NotFound("Task"));
    }
    repo::save_all(store, &tasks).await?;

    info!(task_id = %id, "task deleted");
    Ok(())
}

pub async fn toggle_completed(store: &dyn Store, id: Uuid) -> Result<Task, Error> {
    let task = get(store, id).await?;
    update(
        store,
        id,
        TaskPatch {
            completed: Some(!task.completed),
            ..TaskPatch::default()
        },
    )
    .await
}

pub async fn toggle_important(store: &dyn Store, id: Uuid) -> Result<Task, Error> {
    let task = get(store, id).await?;
    update(
        store,
        id,
        TaskPatch {
            important: Some(!task.important),
            ..TaskPatch::default()
        },
    )
    .await
}
