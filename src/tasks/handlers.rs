use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use time::{macros::format_description, Date, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::error::Error;
use crate::state::AppState;
use crate::tasks::model::{Task, TaskDraft, TaskPatch};
use crate::tasks::{services, views};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/today", get(today_view))
        .route("/tasks/important", get(important_view))
        .route("/tasks/planned", get(planned_view))
        .route("/tasks/assigned", get(assigned_view))
        .route("/tasks/overdue", get(overdue_view))
        .route("/tasks/upcoming", get(upcoming_view))
        .route("/tasks/due/:date", get(due_on_view))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/:id", patch(update_task).delete(delete_task))
        .route("/tasks/:id/toggle", post(toggle_completed))
        .route("/tasks/:id/important", post(toggle_important))
}

#[instrument(skip(state))]
async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    Ok(Json(services::list(state.store.as_ref()).await?))
}

#[instrument(skip(state, draft))]
async fn create_task(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), Error> {
    let task = services::create(state.store.as_ref(), draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, patch))]
async fn update_task(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, Error> {
    Ok(Json(services::update(state.store.as_ref(), id, patch).await?))
}

#[instrument(skip(state))]
async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    services::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn toggle_completed(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, Error> {
    Ok(Json(services::toggle_completed(state.store.as_ref(), id).await?))
}

#[instrument(skip(state))]
async fn toggle_important(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, Error> {
    Ok(Json(services::toggle_important(state.store.as_ref(), id).await?))
}

#[instrument(skip(state))]
async fn today_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = services::list(state.store.as_ref()).await?;
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(owned(views::todos_for_today(&tasks, today))))
}

#[instrument(skip(state))]
async fn important_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = services::list(state.store.as_ref()).await?;
    Ok(Json(owned(views::important_todos(&tasks))))
}

#[instrument(skip(state))]
async fn planned_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = services::list(state.store.as_ref()).await?;
    Ok(Json(owned(views::planned_todos(&tasks))))
}

#[instrument(skip(state))]
async fn assigned_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = services::list(state.store.as_ref()).await?;
    Ok(Json(owned(views::assigned_todos(&tasks))))
}

#[instrument(skip(state))]
async fn overdue_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = services::list(state.store.as_ref()).await?;
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(
        tasks
            .iter()
            .filter(|t| views::is_overdue(t, today))
            .cloned()
            .collect(),
    ))
}

#[instrument(skip(state))]
async fn upcoming_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Task>>, Error> {
    let tasks = services::list(state.store.as_ref()).await?;
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(owned(views::upcoming_todos(&tasks, today))))
}

#[instrument(skip(state))]
async fn due_on_view(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<Vec<Task>>, Error> {
    let day = Date::parse(&date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::Validation("Invalid date".into()))?;
    let tasks = services::list(state.store.as_ref()).await?;
    Ok(Json(owned(views::due_on(&tasks, day))))
}

fn owned(view: Vec<&Task>) -> Vec<Task> {
    view.into_iter().cloned().collect()
}
