use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod model;
mod repo;
pub mod services;
pub mod views;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
