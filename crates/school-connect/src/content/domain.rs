use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::validate::{self, Checked, ValidationError};
use crate::store::{default_true, record_fields, Record, RecordId, Timestamp, UniqueKey};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn json_object(field: &'static str, value: &Value) -> Checked {
    if !value.is_object() {
        return Err(ValidationError::new(field, "must be a JSON object"));
    }
    Ok(())
}

fn optional_text(field: &'static str, value: Option<&str>, max: usize) -> Checked {
    match value {
        Some(value) => validate::max_chars(field, value, max),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroSlide {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for HeroSlide {
    const TABLE: &'static str = "hero_slides";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::optional_url("image_url", self.image_url.as_deref())?;
        optional_text("button_text", self.button_text.as_deref(), 100)?;
        validate::optional_url("button_link", self.button_link.as_deref())
    }
}

fn default_priority() -> i32 {
    1
}

/// Ticker item; hidden once `expires_at` has passed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreakingNews {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    pub content: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl BreakingNews {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

impl Record for BreakingNews {
    const TABLE: &'static str = "breaking_news";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::required("content", &self.content)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Text,
    Html,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(default)]
    pub id: RecordId,
    pub page_name: String,
    pub section_name: String,
    #[serde(default)]
    pub content_type: ContentType,
    pub content: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for PageContent {
    const TABLE: &'static str = "page_content";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::composite(
            "page_name, section_name",
            [self.page_name.clone(), self.section_name.clone()],
        )]
    }

    fn validate(&self) -> Checked {
        validate::text("page_name", &self.page_name, 100)?;
        validate::text("section_name", &self.section_name, 100)?;
        if self.content_type == ContentType::Json
            && serde_json::from_str::<Value>(&self.content).is_err()
        {
            return Err(ValidationError::new("content", "must hold valid JSON"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolFeature {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for SchoolFeature {
    const TABLE: &'static str = "school_features";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::required("description", &self.description)?;
        optional_text("icon", self.icon.as_deref(), 100)?;
        validate::optional_url("image_url", self.image_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolStats {
    #[serde(default)]
    pub id: RecordId,
    pub stat_name: String,
    pub stat_value: String,
    pub stat_label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for SchoolStats {
    const TABLE: &'static str = "school_stats";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("stat_name", &self.stat_name, 100)?;
        validate::text("stat_value", &self.stat_value, 50)?;
        validate::text("stat_label", &self.stat_label, 100)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffCounts {
    #[serde(default)]
    pub id: RecordId,
    pub department: String,
    pub position: String,
    #[serde(default)]
    pub count: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for StaffCounts {
    const TABLE: &'static str = "staff_counts";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("department", &self.department, 100)?;
        validate::text("position", &self.position, 100)?;
        validate::at_least("count", self.count, 0)
    }
}

fn default_rating() -> u8 {
    5
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub designation: Option<String>,
    pub content: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: u8,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for Testimonial {
    const TABLE: &'static str = "testimonials";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 255)?;
        validate::required("content", &self.content)?;
        validate::optional_url("photo_url", self.photo_url.as_deref())?;
        validate::within("rating", self.rating, 1, 5)
    }
}

/// Message sent through the public contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_replied: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for ContactSubmission {
    const TABLE: &'static str = "contact_submissions";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 255)?;
        validate::email("email", &self.email)?;
        optional_text("phone", self.phone.as_deref(), 20)?;
        validate::text("subject", &self.subject, 255)?;
        validate::required("message", &self.message)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Facebook,
    Twitter,
    Instagram,
    Linkedin,
    Youtube,
    Whatsapp,
    Telegram,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialMediaLink {
    #[serde(default)]
    pub id: RecordId,
    pub platform: Platform,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for SocialMediaLink {
    const TABLE: &'static str = "social_media_links";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::url("url", &self.url)?;
        optional_text("icon", self.icon.as_deref(), 100)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardType {
    #[default]
    GoverningBoard,
    BoardOfDirectors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardMember {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub board_type: BoardType,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default = "empty_object")]
    pub social_links: Value,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for BoardMember {
    const TABLE: &'static str = "board_members";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 255)?;
        validate::text("position", &self.position, 255)?;
        validate::optional_url("photo_url", Some(self.photo_url.as_str()))?;
        json_object("social_links", &self.social_links)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderPosition {
    Chairman,
    #[default]
    Principal,
    VicePrincipal,
    Manager,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadershipMessage {
    #[serde(default)]
    pub id: RecordId,
    pub person_name: String,
    pub person_title: String,
    pub position: LeaderPosition,
    pub message_content: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for LeadershipMessage {
    const TABLE: &'static str = "leadership_messages";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("person_name", &self.person_name, 255)?;
        validate::text("person_title", &self.person_title, 255)?;
        validate::required("message_content", &self.message_content)?;
        validate::optional_url("photo_url", Some(self.photo_url.as_str()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPageContent {
    #[serde(default)]
    pub id: RecordId,
    pub content_type: String,
    pub title: String,
    pub content: String,
    #[serde(default = "empty_object")]
    pub additional_data: Value,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for ContactPageContent {
    const TABLE: &'static str = "contact_page_content";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("content_type", &self.content_type, 50)?;
        validate::text("title", &self.title, 255)?;
        json_object("additional_data", &self.additional_data)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactAddress {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for ContactAddress {
    const TABLE: &'static str = "contact_addresses";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::text("address_line_1", &self.address_line_1, 255)?;
        validate::max_chars("address_line_2", &self.address_line_2, 255)?;
        validate::text("city", &self.city, 100)?;
        validate::text("state", &self.state, 100)?;
        validate::text("postal_code", &self.postal_code, 20)?;
        validate::text("country", &self.country, 100)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactLocation {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for ContactLocation {
    const TABLE: &'static str = "contact_locations";

    record_fields!(created: created_at, updated: updated_at);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::url("url", &self.url)
    }
}
