//! Turns a raw JSON document into a checker verdict.
//!
//! A field holding the wrong JSON type is reported as a violation of that field,
//! alongside every other contract violation. Only input that is not a JSON object
//! at all is treated as malformed.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{FieldViolation, Result};
use crate::game_group::game_group_dto::field_position;
use crate::game_group::{
    AccessRule, GameGroupUpdatePayload, Modality, UpdateGameGroupRequest, ValidationPolicy,
    Visibility,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Valid,
    Invalid,
    Malformed,
}

impl CheckStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            CheckStatus::Valid => 0,
            CheckStatus::Invalid => 1,
            CheckStatus::Malformed => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    /// Pretty JSON meant for stdout.
    pub output: String,
}

#[derive(Debug, Serialize)]
struct ViolationReport<'a> {
    violations: &'a [FieldViolation],
}

enum Expected {
    Text,
    Token(Vec<&'static str>),
    Integer,
}

const TEXT_FIELDS: [&str; 12] = [
    "campaignName",
    "description",
    "gameSystem",
    "settingWorld",
    "shortDescription",
    "country",
    "state",
    "city",
    "themesContent",
    "punctualityAttendance",
    "houseRules",
    "behavioralExpectations",
];

fn expected_type(field: &str) -> Option<Expected> {
    match field {
        "visibility" => Some(Expected::Token(Visibility::ALL.map(|v| v.as_str()).to_vec())),
        "accessRule" => Some(Expected::Token(AccessRule::ALL.map(|v| v.as_str()).to_vec())),
        "modality" => Some(Expected::Token(Modality::ALL.map(|v| v.as_str()).to_vec())),
        "minPlayers" | "maxPlayers" => Some(Expected::Integer),
        f if TEXT_FIELDS.contains(&f) => Some(Expected::Text),
        _ => None,
    }
}

pub fn check_payload(raw: &str, policy: &ValidationPolicy) -> Result<CheckOutcome> {
    let document: Value = match serde_json::from_str(raw) {
        Ok(document) => document,
        Err(e) => return malformed(format!("payload is not valid JSON: {}", e)),
    };
    let Value::Object(mut fields) = document else {
        return malformed("payload must be a JSON object".to_string());
    };

    let mistyped = take_mistyped_fields(&mut fields);

    let payload: GameGroupUpdatePayload = match serde_json::from_value(Value::Object(fields)) {
        Ok(payload) => payload,
        Err(e) => return malformed(format!("payload could not be read: {}", e)),
    };

    let mut violations = match UpdateGameGroupRequest::from_payload_with(payload, policy) {
        Ok(request) if mistyped.is_empty() => {
            let normalized = GameGroupUpdatePayload::from(request);
            return Ok(CheckOutcome {
                status: CheckStatus::Valid,
                output: serde_json::to_string_pretty(&normalized)?,
            });
        }
        Ok(_) => Vec::new(),
        Err(failure) => failure
            .violations
            .into_iter()
            .filter(|v| !mistyped.iter().any(|m| m.field == v.field))
            .collect(),
    };

    violations.extend(mistyped);
    violations.sort_by_key(|v| field_position(&v.field));

    tracing::debug!(violations = violations.len(), "Payload failed the update contract");

    Ok(CheckOutcome {
        status: CheckStatus::Invalid,
        output: serde_json::to_string_pretty(&ViolationReport {
            violations: &violations,
        })?,
    })
}

/// Removes fields whose JSON type cannot hold the contract value and reports each one.
fn take_mistyped_fields(fields: &mut Map<String, Value>) -> Vec<FieldViolation> {
    let mut mistyped = Vec::new();

    let names: Vec<String> = fields.keys().cloned().collect();
    for name in names {
        let Some(expected) = expected_type(&name) else {
            continue;
        };
        let Some(value) = fields.get(&name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let violation = match expected {
            Expected::Text if !value.is_string() => Some(FieldViolation::new(
                name.as_str(),
                "type",
                "must be a string",
            )),
            Expected::Token(tokens) if !value.is_string() => Some(FieldViolation::new(
                name.as_str(),
                "one_of",
                format!("must be one of {}", tokens.join(", ")),
            )),
            Expected::Integer if !fits_i32(value) => Some(FieldViolation::new(
                name.as_str(),
                "type",
                "must be an integer",
            )),
            _ => None,
        };

        if let Some(violation) = violation {
            fields.remove(&name);
            mistyped.push(violation);
        }
    }

    mistyped
}

fn fits_i32(value: &Value) -> bool {
    value
        .as_i64()
        .map(|n| i32::try_from(n).is_ok())
        .unwrap_or(false)
}

fn malformed(message: String) -> Result<CheckOutcome> {
    tracing::error!("{}", message);
    let body = json!({
        "error": {
            "code": "malformed_payload",
            "message": message,
        }
    });
    Ok(CheckOutcome {
        status: CheckStatus::Malformed,
        output: serde_json::to_string_pretty(&body)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_policy() -> ValidationPolicy {
        ValidationPolicy::default()
    }

    fn valid_json() -> Value {
        json!({
            "campaignName": "ABC",
            "gameSystem": "D&D",
            "shortDescription": "Quick one-shot",
            "visibility": "PUBLIC",
            "accessRule": "FREE",
            "modality": "ONLINE"
        })
    }

    fn run(document: &Value) -> (CheckStatus, Value) {
        let outcome = check_payload(&document.to_string(), &default_policy()).unwrap();
        let output: Value = serde_json::from_str(&outcome.output).unwrap();
        (outcome.status, output)
    }

    fn violation_fields(output: &Value) -> Vec<(String, String)> {
        output["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| {
                (
                    v["field"].as_str().unwrap().to_string(),
                    v["code"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_valid_payload_prints_normalized_payload() {
        let mut document = valid_json();
        document["city"] = json!("Recife");
        document["unknownKey"] = json!(true);

        let (status, output) = run(&document);

        assert_eq!(status, CheckStatus::Valid);
        assert_eq!(status.exit_code(), 0);
        let mut expected = valid_json();
        expected["city"] = json!("Recife");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_contract_violations_are_listed() {
        let mut document = valid_json();
        document["visibility"] = json!("SECRET");
        document.as_object_mut().unwrap().remove("gameSystem");

        let (status, output) = run(&document);

        assert_eq!(status, CheckStatus::Invalid);
        assert_eq!(status.exit_code(), 1);
        assert_eq!(
            violation_fields(&output),
            vec![
                ("gameSystem".to_string(), "required".to_string()),
                ("visibility".to_string(), "one_of".to_string()),
            ]
        );
    }

    #[test]
    fn test_wrong_json_type_is_a_field_violation() {
        let mut document = valid_json();
        document["visibility"] = json!(5);

        let (status, output) = run(&document);

        assert_eq!(status, CheckStatus::Invalid);
        assert_eq!(
            output["violations"],
            json!([{
                "field": "visibility",
                "code": "one_of",
                "message": "must be one of PUBLIC, FRIENDS, PRIVATE"
            }])
        );
    }

    #[test]
    fn test_wrong_types_are_reported_with_other_violations() {
        let document = json!({
            "campaignName": 42,
            "gameSystem": "D&D",
            "shortDescription": "AB",
            "visibility": "PUBLIC",
            "accessRule": ["FREE"],
            "modality": "ONLINE",
            "minPlayers": "x",
            "maxPlayers": 2.5,
            "city": "c".repeat(101)
        });

        let (status, output) = run(&document);

        assert_eq!(status, CheckStatus::Invalid);
        assert_eq!(
            violation_fields(&output),
            vec![
                ("campaignName".to_string(), "type".to_string()),
                ("shortDescription".to_string(), "length".to_string()),
                ("accessRule".to_string(), "one_of".to_string()),
                ("minPlayers".to_string(), "type".to_string()),
                ("maxPlayers".to_string(), "type".to_string()),
                ("city".to_string(), "length".to_string()),
            ]
        );
    }

    #[test]
    fn test_out_of_range_player_count_is_a_type_violation() {
        let mut document = valid_json();
        document["maxPlayers"] = json!(i64::from(i32::MAX) + 1);

        let (status, output) = run(&document);

        assert_eq!(status, CheckStatus::Invalid);
        assert_eq!(
            violation_fields(&output),
            vec![("maxPlayers".to_string(), "type".to_string())]
        );
    }

    #[test]
    fn test_null_optional_field_is_absent() {
        let mut document = valid_json();
        document["description"] = Value::Null;

        let (status, _) = run(&document);
        assert_eq!(status, CheckStatus::Valid);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let outcome = check_payload("{\"campaignName\": ", &default_policy()).unwrap();

        assert_eq!(outcome.status, CheckStatus::Malformed);
        assert_eq!(outcome.status.exit_code(), 2);
        let output: Value = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(output["error"]["code"], "malformed_payload");
        assert!(output["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("payload is not valid JSON"));
    }

    #[test]
    fn test_non_object_document_is_malformed() {
        for raw in ["[]", "\"PUBLIC\"", "42", "null"] {
            let outcome = check_payload(raw, &default_policy()).unwrap();
            assert_eq!(outcome.status, CheckStatus::Malformed, "{raw}");
        }
    }

    #[test]
    fn test_policy_is_applied() {
        let mut document = valid_json();
        document["minPlayers"] = json!(6);
        document["maxPlayers"] = json!(3);
        let raw = document.to_string();

        let lenient = check_payload(&raw, &default_policy()).unwrap();
        assert_eq!(lenient.status, CheckStatus::Valid);

        let strict = check_payload(
            &raw,
            &ValidationPolicy {
                enforce_player_range: true,
            },
        )
        .unwrap();
        assert_eq!(strict.status, CheckStatus::Invalid);
        assert!(strict.output.contains("player_range"));
    }
}
