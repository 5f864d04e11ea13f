use axum::Router;
use thiserror::Error;

use crate::state::AppState;

mod client;
pub mod dto;
#[cfg(test)]
pub mod fake;
mod handlers;

pub use client::{OpenFoodFacts, ProductLookup};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("product database returned {0}")]
    Status(u16),
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}
