use axum::Router;

use crate::state::AppState;

pub mod dto;
mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo_types::Supplement;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
