use axum::Router;

use crate::state::AppState;

mod claims;
mod dto;
mod extractors;
mod handlers;
mod password;
mod repo;
mod repo_types;
mod services;

pub use extractors::AuthUser;
pub use services::JwtKeys;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
