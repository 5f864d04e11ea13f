use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{validate_barcode, BarcodeProduct};
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/barcode/:code", get(lookup_barcode))
}

/// GET /barcode/:code; nutrition per 100 g from OpenFoodFacts.
#[instrument(skip(state))]
pub async fn lookup_barcode(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<BarcodeProduct>> {
    validate_barcode(&code)?;
    let product = state
        .products
        .lookup(&code)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    info!(%user_id, barcode = %code, product = %product.name, "barcode resolved");
    Ok(Json(product))
}
