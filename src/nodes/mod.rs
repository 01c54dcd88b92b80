pub mod config;

use crate::dsl::ActionType;
use serde::Serialize;

/// Display metadata of one action type, as shown on the palette and on the node card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTypeMetadata {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub label: &'static str,
    pub description: &'static str,
    /// Icon identifier understood by the rendering layer.
    pub icon: &'static str,
    /// Color token understood by the rendering layer.
    pub color: &'static str,
}

static NODE_TYPES: [NodeTypeMetadata; 8] = [
    NodeTypeMetadata {
        kind: ActionType::CreateRoom,
        label: "Create Room",
        description: "Créer un nouveau salon Matrix",
        icon: "Plus",
        color: "bg-blue-500",
    },
    NodeTypeMetadata {
        kind: ActionType::InviteUser,
        label: "Invite User",
        description: "Inviter un utilisateur dans un salon",
        icon: "UserPlus",
        color: "bg-green-500",
    },
    NodeTypeMetadata {
        kind: ActionType::SendMessage,
        label: "Send Message",
        description: "Envoyer un message dans un salon",
        icon: "MessageSquare",
        color: "bg-purple-500",
    },
    NodeTypeMetadata {
        kind: ActionType::WaitTime,
        label: "Wait Time",
        description: "Attendre un certain temps",
        icon: "Clock",
        color: "bg-yellow-500",
    },
    NodeTypeMetadata {
        kind: ActionType::AnalyseStats,
        label: "Analyse Stats",
        description: "Analyser les statistiques",
        icon: "BarChart",
        color: "bg-orange-500",
    },
    NodeTypeMetadata {
        kind: ActionType::DestroyRoom,
        label: "Destroy Room",
        description: "Supprimer un salon",
        icon: "Trash2",
        color: "bg-red-500",
    },
    NodeTypeMetadata {
        kind: ActionType::WebhookTrigger,
        label: "Webhook Trigger",
        description: "Déclencher un webhook",
        icon: "Webhook",
        color: "bg-indigo-500",
    },
    // Authoring only: branches can be drawn but nothing evaluates their conditions.
    NodeTypeMetadata {
        kind: ActionType::Split,
        label: "Split",
        description: "Séparer le flux en branches conditionnelles",
        icon: "GitBranch",
        color: "bg-cyan-500",
    },
];

pub fn all() -> &'static [NodeTypeMetadata] {
    &NODE_TYPES
}

/// `None` for a kind the registry does not know.
pub fn lookup(kind: &ActionType) -> Option<&'static NodeTypeMetadata> {
    NODE_TYPES.iter().find(|meta| &meta.kind == kind)
}

pub fn lookup_name(name: &str) -> Option<&'static NodeTypeMetadata> {
    NODE_TYPES.iter().find(|meta| meta.kind.as_str() == name)
}
