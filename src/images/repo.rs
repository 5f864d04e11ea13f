use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedImage {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub image_group_id: Uuid,
    pub is_primary: bool,
    #[serde(skip_serializing)]
    pub s3_key: String,
    pub content_type: String,
    pub analyzed: bool,
    pub analysis_result: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, image_group_id, is_primary, s3_key, content_type, \
                       analyzed, analysis_result, created_at";

pub struct NewImage<'a> {
    pub id: Uuid,
    pub group_id: Uuid,
    pub is_primary: bool,
    pub s3_key: &'a str,
    pub content_type: &'a str,
}

pub async fn insert_image_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    img: &NewImage<'_>,
) -> anyhow::Result<SavedImage> {
    let row = sqlx::query_as::<_, SavedImage>(&format!(
        r#"
        INSERT INTO saved_images (id, user_id, image_group_id, is_primary, s3_key, content_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(img.id)
    .bind(user_id)
    .bind(img.group_id)
    .bind(img.is_primary)
    .bind(img.s3_key)
    .bind(img.content_type)
    .fetch_one(&mut **tx)
    .await
    .context("insert saved image")?;
    Ok(row)
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<SavedImage>> {
    let rows = sqlx::query_as::<_, SavedImage>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM saved_images
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list images by user")?;
    Ok(rows)
}

pub async fn find_owned(
    db: &PgPool,
    user_id: Uuid,
    image_id: Uuid,
) -> anyhow::Result<Option<SavedImage>> {
    let row = sqlx::query_as::<_, SavedImage>(&format!(
        "SELECT {COLUMNS} FROM saved_images WHERE id = $1 AND user_id = $2"
    ))
    .bind(image_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("find image")?;
    Ok(row)
}

/// The non-primary images uploaded together with `primary`, oldest first.
pub async fn list_group_extras(db: &PgPool, primary: &SavedImage) -> anyhow::Result<Vec<SavedImage>> {
    let rows = sqlx::query_as::<_, SavedImage>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM saved_images
         WHERE image_group_id = $1 AND id <> $2 AND NOT is_primary
         ORDER BY created_at ASC
        "#
    ))
    .bind(primary.image_group_id)
    .bind(primary.id)
    .fetch_all(db)
    .await
    .context("list image group")?;
    Ok(rows)
}

/// Stores the analysis on the primary image and flags the whole group as analyzed.
pub async fn save_analysis(
    db: &PgPool,
    primary: &SavedImage,
    result: &serde_json::Value,
) -> anyhow::Result<()> {
    let mut tx = db.begin().await.context("begin tx")?;
    sqlx::query("UPDATE saved_images SET analyzed = TRUE, analysis_result = $1 WHERE id = $2")
        .bind(result)
        .bind(primary.id)
        .execute(&mut *tx)
        .await
        .context("store analysis")?;
    sqlx::query("UPDATE saved_images SET analyzed = TRUE WHERE image_group_id = $1")
        .bind(primary.image_group_id)
        .execute(&mut *tx)
        .await
        .context("mark group analyzed")?;
    tx.commit().await.context("commit tx")?;
    Ok(())
}

/// Deletes the row and hands back its object key.
pub async fn delete_owned(db: &PgPool, user_id: Uuid, image_id: Uuid) -> anyhow::Result<Option<String>> {
    let key = sqlx::query_scalar::<_, String>(
        "DELETE FROM saved_images WHERE id = $1 AND user_id = $2 RETURNING s3_key",
    )
    .bind(image_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("delete image")?;
    Ok(key)
}
