use serde::{Deserialize, Serialize};

use crate::store::validate::{self, Checked};
use crate::store::{default_true, record_fields, Record, RecordId, Timestamp};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoCategory {
    Events,
    Campus,
    Students,
    Activities,
    Achievements,
    Facilities,
    #[default]
    Other,
}

impl PhotoCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoCategory::Events => "events",
            PhotoCategory::Campus => "campus",
            PhotoCategory::Students => "students",
            PhotoCategory::Activities => "activities",
            PhotoCategory::Achievements => "achievements",
            PhotoCategory::Facilities => "facilities",
            PhotoCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryPhoto {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category: PhotoCategory,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub uploaded_by: Option<RecordId>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl GalleryPhoto {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(validate::split_list)
            .unwrap_or_default()
    }

    /// Case-insensitive substring match over the raw tag string.
    pub fn has_tag_like(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.to_lowercase().contains(&needle))
    }
}

impl Record for GalleryPhoto {
    const TABLE: &'static str = "gallery_photos";

    record_fields!(created: created_at, updated: updated_at, keep: [uploaded_by]);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::url("image_url", &self.image_url)?;
        validate::optional_url("thumbnail_url", self.thumbnail_url.as_deref())?;
        if let Some(tags) = &self.tags {
            validate::max_chars("tags", tags, 500)?;
        }
        Ok(())
    }
}
