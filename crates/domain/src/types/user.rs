//! User profile as returned by `GET /accounts/me`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::fields::PayloadFields;
use super::ExtraFields;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = PayloadFields::deserialize(deserializer)?;
        Ok(Self {
            id: fields.take_id(),
            email: fields.take("email"),
            name: fields.take("name"),
            first_name: fields.take("firstName"),
            last_name: fields.take("lastName"),
            created_at: fields.take("createdAt"),
            last_login: fields.take("lastLogin"),
            extra: fields.into_extra(),
        })
    }
}

impl User {
    /// Name to show in the UI: full name, then first + last, then email.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        if !parts.is_empty() {
            return parts.join(" ");
        }

        self.email.clone().unwrap_or_else(|| self.id.clone())
    }
}
