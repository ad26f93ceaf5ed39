use serde::{Deserialize, Serialize};

use crate::store::validate::{self, Checked};
use crate::store::{default_true, record_fields, Record, RecordId, Timestamp, UniqueKey};

fn default_color() -> String {
    "#3B82F6".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCategory {
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

impl Record for EventCategory {
    const TABLE: &'static str = "event_categories";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::single("name", &self.name)]
    }

    fn validate(&self) -> Checked {
        validate::text("name", &self.name, 100)?;
        validate::hex_color("color", &self.color)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub event_date: Timestamp,
    #[serde(default)]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: Option<RecordId>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub max_attendees: Option<u32>,
    #[serde(default)]
    pub registration_required: bool,
    #[serde(default)]
    pub registration_deadline: Option<Timestamp>,
    #[serde(default)]
    pub created_by: Option<RecordId>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Event {
    pub fn is_past(&self, now: Timestamp) -> bool {
        self.event_date < now
    }

    pub fn is_upcoming(&self, now: Timestamp) -> bool {
        self.event_date > now
    }

    pub fn registration_closed(&self, now: Timestamp) -> bool {
        self.registration_deadline
            .is_some_and(|deadline| deadline < now)
    }
}

impl Record for Event {
    const TABLE: &'static str = "events";

    record_fields!(created: created_at, updated: updated_at, keep: [created_by]);

    fn validate(&self) -> Checked {
        validate::text("title", &self.title, 255)?;
        validate::required("description", &self.description)?;
        validate::max_chars("location", &self.location, 255)?;
        validate::optional_url("image_url", Some(self.image_url.as_str()))?;
        validate::ordered("end_date", Some(self.event_date), self.end_date)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRegistration {
    #[serde(default)]
    pub id: RecordId,
    pub event: RecordId,
    #[serde(default)]
    pub user: RecordId,
    #[serde(default)]
    pub status: RegistrationStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub registration_date: Timestamp,
}

impl Record for EventRegistration {
    const TABLE: &'static str = "event_registrations";

    record_fields!(created: registration_date, keep: [user]);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::composite(
            "event, user",
            [self.event.to_string(), self.user.to_string()],
        )]
    }
}
