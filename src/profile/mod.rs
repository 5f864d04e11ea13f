use axum::Router;

use crate::state::AppState;

pub mod dto;
mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use services::{targets_for_user, ResolvedTargets};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
