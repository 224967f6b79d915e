//! User

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{id_type, parse_timestamp};
use crate::{codec::JsonModel, error::Result};

id_type!(UserId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Moderator,
    Developer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<u64>,

    /// Set only on the user returned by [`crate::Modrinth::user_from_auth`].
    #[serde(skip)]
    pub auth: Option<String>,
}

impl JsonModel for User {}

impl User {
    pub fn created_at(&self) -> Result<time::OffsetDateTime> {
        parse_timestamp(&self.created)
    }

    #[must_use]
    pub fn with_auth(mut self, auth: Option<String>) -> Self {
        self.auth = auth;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: UserId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<String>,
    pub title: String,
    pub text: String,
    pub link: String,
    pub read: bool,
    pub created: String,
    #[serde(default)]
    pub actions: Vec<Value>,
}

impl JsonModel for Notification {}

impl Notification {
    /// The project name the service puts in bold, e.g. `**Sodium**` in
    /// `You have been invited to join **Sodium**`.
    pub fn project_title(&self) -> Option<&str> {
        let mut parts = self.title.split("**");
        parts.next()?;
        let name = parts.next()?;
        // An unclosed marker is not a bolded name.
        parts.next().map(|_| name)
    }
}
