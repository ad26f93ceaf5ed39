use serde::{Deserialize, Serialize};

use crate::store::validate::{self, Checked};
use crate::store::{record_fields, Record, RecordId, Timestamp, UniqueKey};

fn default_color() -> String {
    "#10B981".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsCategory {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for NewsCategory {
    const TABLE: &'static str = "news_categories";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("name", &self.name)]
    }

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 100)?;
        validate::hex_color("color", &self.color)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsPost {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub category: Option<RecordId>,
    #[serde(default)]
    pub author: Option<RecordId>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_image_url: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub views_count: u32,
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl NewsPost {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn tag_list(&self) -> Vec<String> {
        validate::split_list(&self.tags)
    }

    /// Exact, case-insensitive match against one of the post's tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tag_list()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }
}

impl Record for NewsPost {
    const TABLE: &'static str = "news_posts";

    record_fields!(
        created: created_at,
        updated: updated_at,
        keep: [author, published_at],
        counters: [views_count],
    );

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("slug", &self.slug)]
    }

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::slug("slug", &self.slug)?;
        validate::max_chars("slug", &self.slug, 255)?;
        validate::required("content", &self.content)?;
        validate::max_chars("excerpt", &self.excerpt, 500)?;
        validate::optional_url("featured_image_url", Some(self.featured_image_url.as_str()))?;
        validate::max_chars("tags", &self.tags, 255)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsComment {
    #[serde(default)]
    pub id: RecordId,
    pub post: RecordId,
    #[serde(default)]
    pub author: RecordId,
    pub content: String,
    #[serde(default)]
    pub status: CommentStatus,
    #[serde(default)]
    pub parent: Option<RecordId>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for NewsComment {
    const TABLE: &'static str = "news_comments";

    record_fields!(created: created_at, updated: updated_at, keep: [author]);

    fn validate(&self) -> Checked {
        validate::required("content", &self.content)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsLike {
    #[serde(default)]
    pub id: RecordId,
    pub post: RecordId,
    #[serde(default)]
    pub user: RecordId,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Record for NewsLike {
    const TABLE: &'static str = "news_likes";

    record_fields!(created: created_at, keep: [user]);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::composite(
            "post, user",
            [self.post.to_string(), self.user.to_string()],
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_whole_entries_only() {
        let post = NewsPost {
            tags: "Sports, Annual Day ,science".into(),
            ..NewsPost::default()
        };
        assert_eq!(post.tag_list(), vec!["Sports", "Annual Day", "science"]);
        assert!(post.has_tag("annual day"));
        assert!(post.has_tag(" SCIENCE "));
        assert!(!post.has_tag("sport"));
    }

    #[test]
    fn slug_and_excerpt_are_checked() {
        let mut post = NewsPost {
            title: "Results".into(),
            slug: "results".into(),
            content: "All passed.".into(),
            ..NewsPost::default()
        };
        assert!(post.validate().is_ok());
        post.excerpt = "x".repeat(501);
        assert_eq!(post.validate().unwrap_err().field, "excerpt");
        post.excerpt.clear();
        post.slug = "not a slug".into();
        assert_eq!(post.validate().unwrap_err().field, "slug");
    }
}
