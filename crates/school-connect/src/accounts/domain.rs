use serde::{Deserialize, Serialize};

use crate::store::validate::{self, Checked};
use crate::store::{default_true, record_fields, Record, RecordId, Timestamp, UniqueKey};

/// Site user; e-mail is the login name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: RecordId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for User {
    const TABLE: &'static str = "users";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![
            UniqueKey::folded("email", &self.email),
            UniqueKey::single("username", &self.username),
        ]
    }

    fn validate(&self) -> Checked {
        validate::email("email", &self.email)?;
        validate::text("username", &self.username, 150)?;
        validate::max_chars("first_name", &self.first_name, 150)?;
        validate::max_chars("last_name", &self.last_name, 150)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
    Moderator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Moderator => "moderator",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRole {
    #[serde(default)]
    pub id: RecordId,
    pub user: RecordId,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Record for UserRole {
    const TABLE: &'static str = "user_roles";

    record_fields!(created: created_at, updated: updated_at);

    fn unique_keys(&self) -> Vec<UniqueKey> {
        vec![UniqueKey::composite(
            "user, role",
            [self.user.to_string(), self.role.as_str().to_string()],
        )]
    }
}
