pub mod builder;

use crate::error::StoreError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Display name given to a workflow that does not carry one.
pub const DEFAULT_WORKFLOW_NAME: &str = "Mon workflow Matrix";

/// Kind of automation step a node stands for.
///
/// The known kinds form a closed set. `Unknown` only exists so that an
/// imported document naming a foreign kind still loads; the store never
/// creates such a node itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    CreateRoom,
    InviteUser,
    SendMessage,
    WaitTime,
    AnalyseStats,
    DestroyRoom,
    WebhookTrigger,
    /// Conditional fork authored in templates. It has no evaluation semantics.
    Split,
    Unknown(String),
}

impl ActionType {
    pub const KNOWN: [ActionType; 8] = [
        ActionType::CreateRoom,
        ActionType::InviteUser,
        ActionType::SendMessage,
        ActionType::WaitTime,
        ActionType::AnalyseStats,
        ActionType::DestroyRoom,
        ActionType::WebhookTrigger,
        ActionType::Split,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ActionType::CreateRoom => "createRoom",
            ActionType::InviteUser => "inviteUser",
            ActionType::SendMessage => "sendMessage",
            ActionType::WaitTime => "waitTime",
            ActionType::AnalyseStats => "analyseStats",
            ActionType::DestroyRoom => "destroyRoom",
            ActionType::WebhookTrigger => "webhookTrigger",
            ActionType::Split => "split",
            ActionType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ActionType::Unknown(_))
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        ActionType::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .unwrap_or(ActionType::Unknown(value))
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Strict parse used for gestures coming from the palette.
impl FromStr for ActionType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ActionType::from(s.to_string()) {
            ActionType::Unknown(name) => Err(StoreError::UnknownActionType(name)),
            kind => Ok(kind),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parameter bag of a node. Keys recognized for each action type are listed
/// in `nodes::config`; anything else is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeConfig(Map<String, Value>);

impl NodeConfig {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.to_string(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for NodeConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    /// Missing until the configuration panel is first opened for the node.
    #[serde(default)]
    pub config: NodeConfig,
    /// Attributes written by other tools, kept for the round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActionType,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: ActionType, position: Position, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            data: NodeData {
                label: label.into(),
                ..NodeData::default()
            },
            extra: Map::new(),
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.data.config
    }
}

/// Directed connection. Extra attributes survive in memory but are not exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// The unit of export and import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default = "default_name", deserialize_with = "null_as_default_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_name() -> String {
    DEFAULT_WORKFLOW_NAME.to_string()
}

// Documents written by other tools may carry `null` for these.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_name))
}

impl Workflow {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: default_name(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}
