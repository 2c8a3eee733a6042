use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::game_group_models::{AccessRule, Modality, Visibility};
use crate::error::{FieldViolation, ValidationFailure};

/// Struct field name paired with its wire name, in declaration order.
const FIELD_NAMES: [(&str, &str); 17] = [
    ("campaign_name", "campaignName"),
    ("description", "description"),
    ("game_system", "gameSystem"),
    ("setting_world", "settingWorld"),
    ("short_description", "shortDescription"),
    ("visibility", "visibility"),
    ("access_rule", "accessRule"),
    ("modality", "modality"),
    ("min_players", "minPlayers"),
    ("max_players", "maxPlayers"),
    ("country", "country"),
    ("state", "state"),
    ("city", "city"),
    ("themes_content", "themesContent"),
    ("punctuality_attendance", "punctualityAttendance"),
    ("house_rules", "houseRules"),
    ("behavioral_expectations", "behavioralExpectations"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Reject payloads where both player counts are given and min exceeds max.
    pub enforce_player_range: bool,
}

/// Plain-text shape of a game group update as it arrives from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameGroupUpdatePayload {
    #[validate(
        required(message = "is required"),
        length(min = 3, max = 100, message = "length must be between 3 and 100")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,

    #[validate(length(max = 500, message = "length must be at most 500"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(
        required(message = "is required"),
        length(min = 2, max = 50, message = "length must be between 2 and 50")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_system: Option<String>,

    #[validate(length(max = 100, message = "length must be at most 100"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setting_world: Option<String>,

    #[validate(
        required(message = "is required"),
        length(min = 3, max = 100, message = "length must be between 3 and 100")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    #[validate(required(message = "is required"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    #[validate(required(message = "is required"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_rule: Option<String>,

    #[validate(required(message = "is required"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_players: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_players: Option<i32>,

    #[validate(length(max = 100, message = "length must be at most 100"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[validate(length(max = 100, message = "length must be at most 100"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[validate(length(max = 100, message = "length must be at most 100"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[validate(length(max = 500, message = "length must be at most 500"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes_content: Option<String>,

    #[validate(length(max = 500, message = "length must be at most 500"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuality_attendance: Option<String>,

    #[validate(length(max = 500, message = "length must be at most 500"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_rules: Option<String>,

    #[validate(length(max = 500, message = "length must be at most 500"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavioral_expectations: Option<String>,
}

impl GameGroupUpdatePayload {
    /// Runs every rule and reports all violations, ordered by field.
    pub fn check(&self, policy: &ValidationPolicy) -> Result<(), ValidationFailure> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        self.check_blank_required(&mut errors);
        self.check_closed_sets(&mut errors);
        if policy.enforce_player_range {
            self.check_player_range(&mut errors);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(collect_violations(&errors))
        }
    }

    pub fn into_request(self) -> Result<UpdateGameGroupRequest, ValidationFailure> {
        UpdateGameGroupRequest::from_payload(self)
    }

    fn check_blank_required(&self, errors: &mut ValidationErrors) {
        let required_text = [
            ("campaign_name", &self.campaign_name),
            ("game_system", &self.game_system),
            ("short_description", &self.short_description),
        ];
        for (field, value) in required_text {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                errors.add(field, violation("required", Cow::Borrowed("is required")));
            }
        }
    }

    fn check_closed_sets(&self, errors: &mut ValidationErrors) {
        check_token::<Visibility>(
            errors,
            "visibility",
            self.visibility.as_deref(),
            &Visibility::ALL.map(|v| v.as_str()),
        );
        check_token::<AccessRule>(
            errors,
            "access_rule",
            self.access_rule.as_deref(),
            &AccessRule::ALL.map(|v| v.as_str()),
        );
        check_token::<Modality>(
            errors,
            "modality",
            self.modality.as_deref(),
            &Modality::ALL.map(|v| v.as_str()),
        );
    }

    fn check_player_range(&self, errors: &mut ValidationErrors) {
        if let (Some(min), Some(max)) = (self.min_players, self.max_players) {
            if min > max {
                let mut error = violation(
                    "player_range",
                    Cow::Owned(format!("must not exceed maxPlayers ({})", max)),
                );
                error.add_param(Cow::Borrowed("max"), &max);
                errors.add("min_players", error);
            }
        }
    }
}

fn check_token<T: FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    allowed: &[&str],
) {
    let Some(raw) = value else {
        return;
    };
    if raw.trim().is_empty() {
        errors.add(field, violation("required", Cow::Borrowed("is required")));
    } else if raw.parse::<T>().is_err() {
        let mut error = violation(
            "one_of",
            Cow::Owned(format!("must be one of {}", allowed.join(", "))),
        );
        error.add_param(Cow::Borrowed("value"), &raw);
        errors.add(field, error);
    }
}

/// Position of a wire field name in declaration order; unknown names sort last.
pub(crate) fn field_position(wire_name: &str) -> usize {
    FIELD_NAMES
        .iter()
        .position(|(_, wire)| *wire == wire_name)
        .unwrap_or(FIELD_NAMES.len())
}

fn violation(code: &'static str, message: Cow<'static, str>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message);
    error
}

/// Flattens validator output into wire-named violations. A `required` hit on a
/// field hides that field's other errors.
fn collect_violations(errors: &ValidationErrors) -> ValidationFailure {
    let field_errors = errors.field_errors();
    let mut violations = Vec::new();

    for (field, wire_name) in FIELD_NAMES {
        let Some(found) = field_errors.get(field) else {
            continue;
        };
        let required = found.iter().find(|e| e.code == "required");
        let reported: Vec<&ValidationError> = match required {
            Some(error) => vec![error],
            None => found.iter().collect(),
        };
        for error in reported {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            violations.push(FieldViolation::new(wire_name, error.code.to_string(), message));
        }
    }

    ValidationFailure::new(violations)
}

/// A validated game group update, ready to hand to whatever performs the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GameGroupUpdatePayload", try_from = "GameGroupUpdatePayload")]
pub struct UpdateGameGroupRequest {
    campaign_name: String,
    description: Option<String>,
    game_system: String,
    setting_world: Option<String>,
    short_description: String,
    visibility: Visibility,
    access_rule: AccessRule,
    modality: Modality,
    min_players: Option<i32>,
    max_players: Option<i32>,
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    themes_content: Option<String>,
    punctuality_attendance: Option<String>,
    house_rules: Option<String>,
    behavioral_expectations: Option<String>,
}

impl UpdateGameGroupRequest {
    pub fn from_payload(payload: GameGroupUpdatePayload) -> Result<Self, ValidationFailure> {
        Self::from_payload_with(payload, &ValidationPolicy::default())
    }

    pub fn from_payload_with(
        payload: GameGroupUpdatePayload,
        policy: &ValidationPolicy,
    ) -> Result<Self, ValidationFailure> {
        if let Err(failure) = payload.check(policy) {
            tracing::debug!(
                violations = failure.len(),
                "Rejected game group update: {}",
                failure
            );
            return Err(failure);
        }

        let GameGroupUpdatePayload {
            campaign_name,
            description,
            game_system,
            setting_world,
            short_description,
            visibility,
            access_rule,
            modality,
            min_players,
            max_players,
            country,
            state,
            city,
            themes_content,
            punctuality_attendance,
            house_rules,
            behavioral_expectations,
        } = payload;

        Ok(Self {
            campaign_name: required_text("campaignName", campaign_name)?,
            description,
            game_system: required_text("gameSystem", game_system)?,
            setting_world,
            short_description: required_text("shortDescription", short_description)?,
            visibility: required_token("visibility", visibility)?,
            access_rule: required_token("accessRule", access_rule)?,
            modality: required_token("modality", modality)?,
            min_players,
            max_players,
            country,
            state,
            city,
            themes_content,
            punctuality_attendance,
            house_rules,
            behavioral_expectations,
        })
    }

    pub fn campaign_name(&self) -> &str {
        &self.campaign_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn game_system(&self) -> &str {
        &self.game_system
    }

    pub fn setting_world(&self) -> Option<&str> {
        self.setting_world.as_deref()
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn access_rule(&self) -> AccessRule {
        self.access_rule
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn min_players(&self) -> Option<i32> {
        self.min_players
    }

    pub fn max_players(&self) -> Option<i32> {
        self.max_players
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn themes_content(&self) -> Option<&str> {
        self.themes_content.as_deref()
    }

    pub fn punctuality_attendance(&self) -> Option<&str> {
        self.punctuality_attendance.as_deref()
    }

    pub fn house_rules(&self) -> Option<&str> {
        self.house_rules.as_deref()
    }

    pub fn behavioral_expectations(&self) -> Option<&str> {
        self.behavioral_expectations.as_deref()
    }
}

// Only reachable if a payload passed `check` with a missing or unknown value.
fn required_text(field: &str, value: Option<String>) -> Result<String, ValidationFailure> {
    value.ok_or_else(|| {
        ValidationFailure::new(vec![FieldViolation::new(field, "required", "is required")])
    })
}

fn required_token<T>(field: &str, value: Option<String>) -> Result<T, ValidationFailure>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required_text(field, value)?;
    raw.parse::<T>().map_err(|e| {
        ValidationFailure::new(vec![FieldViolation::new(field, "one_of", e.to_string())])
    })
}

impl TryFrom<GameGroupUpdatePayload> for UpdateGameGroupRequest {
    type Error = ValidationFailure;

    fn try_from(payload: GameGroupUpdatePayload) -> Result<Self, Self::Error> {
        Self::from_payload(payload)
    }
}

impl From<UpdateGameGroupRequest> for GameGroupUpdatePayload {
    fn from(request: UpdateGameGroupRequest) -> Self {
        Self {
            campaign_name: Some(request.campaign_name),
            description: request.description,
            game_system: Some(request.game_system),
            setting_world: request.setting_world,
            short_description: Some(request.short_description),
            visibility: Some(request.visibility.to_string()),
            access_rule: Some(request.access_rule.to_string()),
            modality: Some(request.modality.to_string()),
            min_players: request.min_players,
            max_players: request.max_players,
            country: request.country,
            state: request.state,
            city: request.city,
            themes_content: request.themes_content,
            punctuality_attendance: request.punctuality_attendance,
            house_rules: request.house_rules,
            behavioral_expectations: request.behavioral_expectations,
        }
    }
}
