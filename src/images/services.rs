use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use super::repo::{self, NewImage, SavedImage};
use crate::ai::dto::ImageInput;
use crate::state::AppState;
use crate::storage::food_photo_key;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
}

/// Uploads a batch of photos as one group; the first one is the primary.
pub async fn upload_image_group(
    st: &AppState,
    user_id: Uuid,
    images: Vec<UploadItem>,
) -> anyhow::Result<Vec<SavedImage>> {
    anyhow::ensure!(!images.is_empty(), "no images provided");

    struct Obj {
        id: Uuid,
        key: String,
        content_type: String,
    }
    let group_id = Uuid::new_v4();
    let mut objs = Vec::with_capacity(images.len());
    for img in images {
        let id = Uuid::new_v4();
        let ext = ext_from_mime(&img.content_type).unwrap_or("bin");
        let key = food_photo_key(user_id, group_id, id, ext);
        st.storage
            .put_object(&key, img.body, &img.content_type)
            .await
            .with_context(|| format!("put_object {}", key))?;
        objs.push(Obj {
            id,
            key,
            content_type: img.content_type,
        });
    }

    let mut tx = st.db.begin().await.context("begin tx")?;
    let mut saved = Vec::with_capacity(objs.len());
    for (i, o) in objs.iter().enumerate() {
        let new = NewImage {
            id: o.id,
            group_id,
            is_primary: i == 0,
            s3_key: &o.key,
            content_type: &o.content_type,
        };
        saved.push(repo::insert_image_tx(&mut tx, user_id, &new).await?);
    }
    tx.commit().await.context("commit tx")?;

    Ok(saved)
}

/// Fetches the primary photo and whichever group extras are still in storage.
pub async fn load_for_analysis(
    st: &AppState,
    primary: &SavedImage,
    extras: &[SavedImage],
) -> anyhow::Result<Vec<ImageInput>> {
    let mut inputs = Vec::with_capacity(1 + extras.len());
    let data = st
        .storage
        .get_object(&primary.s3_key)
        .await
        .with_context(|| format!("load primary image {}", primary.id))?;
    inputs.push(ImageInput {
        media_type: media_type_for(&primary.content_type).to_string(),
        data,
    });
    for img in extras {
        match st.storage.get_object(&img.s3_key).await {
            Ok(data) => inputs.push(ImageInput {
                media_type: media_type_for(&img.content_type).to_string(),
                data,
            }),
            Err(e) => warn!(error = %e, image_id = %img.id, "skipping missing group image"),
        }
    }
    Ok(inputs)
}

pub async fn presign_by_key(st: &AppState, s3_key: &str) -> anyhow::Result<String> {
    const TTL: Duration = Duration::from_secs(30 * 60);
    st.storage
        .presign_get(s3_key, TTL)
        .await
        .with_context(|| format!("presign url for s3_key {}", s3_key))
}

pub(crate) fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Media type the model accepts for a stored content type; unknowns are sent as JPEG.
pub(crate) fn media_type_for(ct: &str) -> &'static str {
    match ct {
        "image/png" => "image/png",
        "image/gif" => "image/gif",
        "image/webp" => "image/webp",
        _ => "image/jpeg",
    }
}

pub(crate) fn is_image(ct: &str) -> bool {
    ext_from_mime(ct).is_some()
}

#[cfg(test)]
mod image_tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/gif"), Some("gif"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert!(!is_image("text/plain"));
    }

    #[test]
    fn media_type_defaults_to_jpeg() {
        assert_eq!(media_type_for("image/webp"), "image/webp");
        assert_eq!(media_type_for("image/heic"), "image/jpeg");
        assert_eq!(media_type_for("image/jpg"), "image/jpeg");
    }

    #[tokio::test]
    async fn presign_embeds_the_key() {
        let state = AppState::fake();
        let url = presign_by_key(&state, "food/u/g/i.webp").await.unwrap();
        assert!(url.contains("food/u/g/i.webp"));
    }

    #[tokio::test]
    async fn analysis_inputs_skip_missing_extras() {
        let state = AppState::fake();
        state
            .storage
            .put_object("a.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        let image = |key: &str, primary: bool| SavedImage {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            image_group_id: Uuid::nil(),
            is_primary: primary,
            s3_key: key.into(),
            content_type: "image/png".into(),
            analyzed: false,
            analysis_result: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let primary = image("a.png", true);
        let inputs = load_for_analysis(&state, &primary, &[image("gone.png", false)])
            .await
            .unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].media_type, "image/png");

        let missing = image("nope.png", true);
        assert!(load_for_analysis(&state, &missing, &[]).await.is_err());
    }
}
