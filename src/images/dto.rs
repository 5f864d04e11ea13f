use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::SavedImage;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

impl Pagination {
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

#[derive(Debug, Serialize)]
pub struct UploadedGroup {
    pub image_group_id: Uuid,
    pub primary_image_id: Uuid,
    pub images: Vec<SavedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.clamped(), (20, 0));
        let p = Pagination { limit: 10_000, offset: -5 };
        assert_eq!(p.clamped(), (100, 0));
    }
}
