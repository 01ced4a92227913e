use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(day, Date, "[year]-[month]-[day]");

/// Task priority. Tasks default to medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A user-owned unit of work with optional scheduling and assignment
/// metadata. `id` and `created_at` are assigned once at creation and
/// never change; `updated_at` moves on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub important: bool,
    pub priority: Priority,
    #[serde(default, with = "day::option")]
    pub due_date: Option<Date>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Client-supplied fields for task creation. Everything but the text is
/// optional; `completed` always starts false and identity/timestamps are
/// never client-supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskDraft {
    pub text: String,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "day::option")]
    pub due_date: Option<Date>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// Explicit partial update. An absent field leaves the attribute
/// untouched; an explicit `null` clears a nullable attribute. Unknown
/// fields are rejected rather than silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub important: Option<bool>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "patch_date")]
    pub due_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub assigned_to: Option<Option<String>>,
}

// Present-but-null deserializes to Some(None), which the merge treats as
// "clear the field"; serde's default covers the absent case.
fn patch_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn patch_date<'de, D>(deserializer: D) -> Result<Option<Option<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wire(#[serde(with = "day::option")] Option<Date>);
    Ok(Some(Option::<Wire>::deserialize(deserializer)?.and_then(|w| w.0)))
}
