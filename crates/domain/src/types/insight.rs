//! Insight entity and list filters

use serde::{Deserialize, Deserializer, Serialize};

use super::fields::PayloadFields;
use super::ExtraFields;

/// A generated spending insight or alert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub insight_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl<'de> Deserialize<'de> for Insight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = PayloadFields::deserialize(deserializer)?;
        Ok(Self {
            id: fields.take_id(),
            user_id: fields.take("userId"),
            insight_type: fields.take("type"),
            severity: fields.take("severity"),
            title: fields.take("title"),
            message: fields.take("message"),
            dismissed: fields.take("dismissed"),
            extra: fields.into_extra(),
        })
    }
}

impl Insight {
    pub fn is_dismissed(&self) -> bool {
        self.dismissed.unwrap_or(false)
    }
}

/// Query filters for `GET /insights`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightFilters {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub insight_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed: Option<bool>,
}
