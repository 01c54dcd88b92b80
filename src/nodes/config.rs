//! Config vocabulary per action type and the shape checks run on import.
//!
//! Nothing here rejects a config. Checks only produce `ConfigIssue`s, and
//! keys outside an action type's vocabulary are never reported.

use crate::dsl::{ActionType, NodeConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    #[default]
    Plain,
    Markdown,
    Html,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatsType {
    #[default]
    RoomActivity,
    UserActivity,
    MessageCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

/// Keys the configuration panel edits for `kind`.
pub fn recognized_keys(kind: &ActionType) -> &'static [&'static str] {
    match kind {
        ActionType::CreateRoom => &["roomName", "visibility", "parentSpace", "members"],
        ActionType::InviteUser => &["userId", "roomId"],
        ActionType::SendMessage => &["message", "format", "targetRoom"],
        ActionType::WaitTime => &["duration", "unit"],
        ActionType::AnalyseStats => &["statsType", "timeRange"],
        ActionType::DestroyRoom => &["roomId"],
        ActionType::WebhookTrigger => &["webhookUrl", "method", "headers"],
        ActionType::Split => &["condition", "conditionType", "branches"],
        ActionType::Unknown(_) => &[],
    }
}

/// Member list as typed in the panel: one identifier per line, blank lines dropped.
pub fn members_from_lines(text: &str) -> Value {
    Value::Array(
        text.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Value::String(line.to_string()))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub key: String,
    pub problem: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.key, self.problem)
    }
}

/// Compares a config against the vocabulary of its action type.
pub fn check_config(kind: &ActionType, config: &NodeConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    let keys = recognized_keys(kind);
    for (key, value) in config.iter() {
        if !keys.iter().any(|k| *k == key.as_str()) {
            continue;
        }
        if let Some(problem) = check_value(key, value) {
            issues.push(ConfigIssue {
                key: key.clone(),
                problem,
            });
        }
    }

    issues
}

fn check_value(key: &str, value: &Value) -> Option<String> {
    match key {
        "visibility" => check_enum::<Visibility>(value, "public, private"),
        "format" => check_enum::<MessageFormat>(value, "plain, markdown, html"),
        "unit" => check_enum::<WaitUnit>(value, "seconds, minutes, hours"),
        "statsType" => check_enum::<StatsType>(value, "roomActivity, userActivity, messageCount"),
        "method" => check_enum::<HttpMethod>(value, "GET, POST"),
        "duration" => match value.as_u64() {
            Some(_) => None,
            None => Some("must be a non-negative integer".to_string()),
        },
        "members" => match value.as_array() {
            Some(items) if items.iter().all(Value::is_string) => None,
            _ => Some("must be a list of user identifiers".to_string()),
        },
        "headers" => match value.as_object() {
            Some(map) if map.values().all(Value::is_string) => None,
            _ => Some("must map header names to strings".to_string()),
        },
        "branches" => match value.as_array() {
            Some(_) => None,
            None => Some("must be a list".to_string()),
        },
        _ => match value {
            Value::String(_) => None,
            _ => Some("must be a string".to_string()),
        },
    }
}

fn check_enum<T: for<'de> Deserialize<'de>>(value: &Value, allowed: &str) -> Option<String> {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(_) => None,
        Err(_) => Some(format!("must be one of: {}", allowed)),
    }
}
