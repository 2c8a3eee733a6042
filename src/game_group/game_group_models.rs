use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::game_group_dto::UpdateGameGroupRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Friends,
    Private,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Visibility::Public, Visibility::Friends, Visibility::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Friends => "FRIENDS",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "visibility",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessRule {
    Free,
    Friends,
    Approval,
}

impl AccessRule {
    pub const ALL: [AccessRule; 3] = [AccessRule::Free, AccessRule::Friends, AccessRule::Approval];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRule::Free => "FREE",
            AccessRule::Friends => "FRIENDS",
            AccessRule::Approval => "APPROVAL",
        }
    }
}

impl std::fmt::Display for AccessRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessRule {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "access rule",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Online,
    Presencial,
}

impl Modality {
    pub const ALL: [Modality; 2] = [Modality::Online, Modality::Presencial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Online => "ONLINE",
            Modality::Presencial => "PRESENCIAL",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "modality",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GameGroup {
    pub id: Uuid,
    pub campaign_name: String,
    pub description: Option<String>,
    pub game_system: String,
    pub setting_world: Option<String>,
    pub short_description: String,
    pub visibility: Visibility,
    pub access_rule: AccessRule,
    pub modality: Modality,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub themes_content: Option<String>,
    pub punctuality_attendance: Option<String>,
    pub house_rules: Option<String>,
    pub behavioral_expectations: Option<String>,
    pub created_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameGroup {
    /// Merges a validated update into the group.
    ///
    /// Required fields always overwrite; optional fields overwrite only when the
    /// request carries a value, so an omitted field keeps what is stored.
    pub fn apply_update(&mut self, update: &UpdateGameGroupRequest) {
        self.campaign_name = update.campaign_name().to_string();
        self.game_system = update.game_system().to_string();
        self.short_description = update.short_description().to_string();
        self.visibility = update.visibility();
        self.access_rule = update.access_rule();
        self.modality = update.modality();

        merge_text(&mut self.description, update.description());
        merge_text(&mut self.setting_world, update.setting_world());
        merge_text(&mut self.country, update.country());
        merge_text(&mut self.state, update.state());
        merge_text(&mut self.city, update.city());
        merge_text(&mut self.themes_content, update.themes_content());
        merge_text(&mut self.punctuality_attendance, update.punctuality_attendance());
        merge_text(&mut self.house_rules, update.house_rules());
        merge_text(&mut self.behavioral_expectations, update.behavioral_expectations());

        if let Some(min) = update.min_players() {
            self.min_players = Some(min);
        }
        if let Some(max) = update.max_players() {
            self.max_players = Some(max);
        }

        self.updated_at = Utc::now();

        tracing::debug!(group_id = %self.id, "Applied update to game group");
    }
}

fn merge_text(target: &mut Option<String>, incoming: Option<&str>) {
    if let Some(value) = incoming {
        *target = Some(value.to_string());
    }
}
