use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{Pagination, UploadedGroup};
use super::repo::{self, SavedImage};
use super::services::{self, UploadItem};
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/images",
            post(upload_images).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/images", get(list_images))
        .route("/images/:id/file", get(image_file))
        .route("/images/:id", delete(delete_image))
}

/// POST /images (multipart, field `files` or `files[]`, one or more photos)
#[instrument(skip(state, mp))]
pub async fn upload_images(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<UploadedGroup>)> {
    let mut files = Vec::new();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if !matches!(field.name(), Some("files") | Some("files[]")) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".into());
        if !services::is_image(&content_type) {
            return Err(AppError::Validation(format!(
                "unsupported image type: {content_type}"
            )));
        }
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
        files.push(UploadItem { body, content_type });
    }
    if files.is_empty() {
        return Err(AppError::Validation("files[] is required".into()));
    }

    let images = services::upload_image_group(&state, user_id, files).await?;
    let (image_group_id, primary_image_id) = match images.first() {
        Some(first) => (first.image_group_id, first.id),
        None => return Err(AppError::Internal(anyhow::anyhow!("upload stored no images"))),
    };
    info!(%user_id, %image_group_id, count = images.len(), "images uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadedGroup {
            image_group_id,
            primary_image_id,
            images,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_images(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<SavedImage>>> {
    let (limit, offset) = p.clamped();
    Ok(Json(repo::list_by_user(&state.db, user_id, limit, offset).await?))
}

/// 302 to a short-lived presigned URL for the stored object.
#[instrument(skip(state))]
pub async fn image_file(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    let image = repo::find_owned(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Image"))?;
    let url = services::presign_by_key(&state, &image.s3_key).await?;
    Ok(Redirect::temporary(&url))
}

#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let key = repo::delete_owned(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Image"))?;
    if let Err(e) = state.storage.delete_object(&key).await {
        warn!(error = %e, image_id = %id, "stored object left behind after delete");
    }
    info!(%user_id, image_id = %id, "image deleted");
    Ok(StatusCode::NO_CONTENT)
}
