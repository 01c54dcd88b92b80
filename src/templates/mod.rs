//! Built-in example workflows offered as starting points.

use crate::dsl::builder::WorkflowBuilder;
use crate::dsl::{ActionType, Workflow};
use serde_json::json;

pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    build: fn() -> Workflow,
}

impl Template {
    /// A fresh, independent copy of the template graph.
    pub fn workflow(&self) -> Workflow {
        (self.build)()
    }
}

static TEMPLATES: [Template; 5] = [
    Template {
        id: "onboarding",
        name: "Onboarding Automatique",
        description: "Crée un salon, envoie un message de bienvenue et analyse les stats",
        icon: "Users",
        color: "from-blue-500 to-blue-600",
        build: onboarding,
    },
    Template {
        id: "split-demo",
        name: "Workflow Conditionnel",
        description: "Démo du node Split avec branches conditionnelles selon le nombre de membres",
        icon: "Zap",
        color: "from-cyan-500 to-cyan-600",
        build: split_demo,
    },
    Template {
        id: "temp-room",
        name: "Salon Temporaire",
        description: "Crée un salon qui s'auto-détruit après 1 heure",
        icon: "Clock",
        color: "from-orange-500 to-orange-600",
        build: temp_room,
    },
    Template {
        id: "webhook",
        name: "Notification Webhook",
        description: "Déclenche un webhook et crée un salon pour les notifications",
        icon: "Zap",
        color: "from-purple-500 to-purple-600",
        build: webhook,
    },
    Template {
        id: "invite-blast",
        name: "Invitation en Masse",
        description: "Crée un salon et invite plusieurs utilisateurs",
        icon: "Users",
        color: "from-green-500 to-green-600",
        build: invite_blast,
    },
];

pub fn all() -> &'static [Template] {
    &TEMPLATES
}

/// Finds a template by id or by display name.
pub fn find(key: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == key || t.name == key)
}

pub fn instantiate(key: &str) -> Option<Workflow> {
    find(key).map(Template::workflow)
}

fn onboarding() -> Workflow {
    WorkflowBuilder::new("onboarding")
        .name("Onboarding Automatique")
        .node("create-1", ActionType::CreateRoom, 250.0, 50.0)
            .label("Créer Salon Bienvenue")
            .config("roomName", "Bienvenue 👋")
            .config("visibility", "private")
            .config("members", json!([]))
            .build()
        .node("msg-1", ActionType::SendMessage, 250.0, 180.0)
            .label("Message Bienvenue")
            .config("message", "🎉 Bienvenue dans notre communauté !\n\nNous sommes ravis de vous accueillir.")
            .config("format", "markdown")
            .build()
        .node("wait-1", ActionType::WaitTime, 250.0, 310.0)
            .label("Attendre 5s")
            .config("duration", 5)
            .config("unit", "seconds")
            .build()
        .node("stats-1", ActionType::AnalyseStats, 250.0, 440.0)
            .label("Analyser Stats")
            .config("statsType", "room")
            .config("timeRange", "24h")
            .build()
        .connect("create-1", "msg-1")
        .connect("msg-1", "wait-1")
        .connect("wait-1", "stats-1")
        .build()
}

fn split_demo() -> Workflow {
    WorkflowBuilder::new("split-demo")
        .name("Test Split - Branches Conditionnelles")
        .node("create-1", ActionType::CreateRoom, 250.0, 50.0)
            .label("Créer Salon Principal")
            .config("roomName", "🎯 Salon Smart")
            .config("visibility", "private")
            .config("members", json!(["@alice:matrix.org", "@bob:matrix.org"]))
            .build()
        .node("split-1", ActionType::Split, 250.0, 200.0)
            .label("Split Flow")
            .config("condition", "userCount > 10")
            .config("conditionType", "userCount")
            .config(
                "branches",
                json!([
                    { "name": "Grand Groupe", "condition": "> 10", "color": "green" },
                    { "name": "Petit Groupe", "condition": "<= 10", "color": "blue" }
                ]),
            )
            .build()
        .node("msg-big-1", ActionType::SendMessage, 100.0, 350.0)
            .label("Message Grande Équipe")
            .config(
                "message",
                "🎉 **Super !** Nous avons une grande équipe active !\n\nN'hésitez pas à créer des sous-groupes.",
            )
            .config("format", "markdown")
            .build()
        .node("invite-1", ActionType::InviteUser, 400.0, 350.0)
            .label("Inviter Plus de Monde")
            .config("userId", "@recruiter:matrix.org")
            .build()
        .node("msg-small-1", ActionType::SendMessage, 400.0, 500.0)
            .label("Encourager Croissance")
            .config("message", "📢 Invitez vos collègues pour agrandir notre communauté !")
            .config("format", "plain")
            .build()
        .connect("create-1", "split-1")
        .connect("split-1", "msg-big-1")
        .connect("split-1", "invite-1")
        .connect("invite-1", "msg-small-1")
        .build()
}

fn temp_room() -> Workflow {
    WorkflowBuilder::new("temp-room")
        .name("Salon Temporaire")
        .node("create-1", ActionType::CreateRoom, 250.0, 50.0)
            .label("Créer Salon Temporaire")
            .config("roomName", "⏰ Salon Temporaire")
            .config("visibility", "private")
            .config("members", json!([]))
            .build()
        .node("msg-1", ActionType::SendMessage, 250.0, 180.0)
            .label("Avertissement")
            .config("message", "⚠️ Ce salon sera supprimé dans 1 heure.")
            .config("format", "plain")
            .build()
        .node("wait-1", ActionType::WaitTime, 250.0, 310.0)
            .label("Attendre 1h")
            .config("duration", 1)
            .config("unit", "hours")
            .build()
        .node("destroy-1", ActionType::DestroyRoom, 250.0, 440.0)
            .label("Supprimer Salon")
            .build()
        .connect("create-1", "msg-1")
        .connect("msg-1", "wait-1")
        .connect("wait-1", "destroy-1")
        .build()
}

fn webhook() -> Workflow {
    WorkflowBuilder::new("webhook")
        .name("Notification Webhook")
        .node("webhook-1", ActionType::WebhookTrigger, 250.0, 50.0)
            .label("Webhook Trigger")
            .config("webhookUrl", "https://your-webhook.com/trigger")
            .config("method", "POST")
            .build()
        .node("create-1", ActionType::CreateRoom, 250.0, 180.0)
            .label("Créer Salon Notifs")
            .config("roomName", "🔔 Notifications")
            .config("visibility", "private")
            .build()
        .node("msg-1", ActionType::SendMessage, 250.0, 310.0)
            .label("Envoyer Notification")
            .config("message", "🚨 Nouvelle alerte webhook reçue !")
            .config("format", "markdown")
            .build()
        .connect("webhook-1", "create-1")
        .connect("create-1", "msg-1")
        .build()
}

fn invite_blast() -> Workflow {
    WorkflowBuilder::new("invite-blast")
        .name("Invitation en Masse")
        .node("create-1", ActionType::CreateRoom, 250.0, 50.0)
            .label("Créer Salon Équipe")
            .config("roomName", "👥 Salon Équipe")
            .config("visibility", "private")
            .build()
        .node("invite-1", ActionType::InviteUser, 150.0, 200.0)
            .label("Inviter User 1")
            .config("userId", "@user1:luxchat.lu")
            .build()
        .node("invite-2", ActionType::InviteUser, 350.0, 200.0)
            .label("Inviter User 2")
            .config("userId", "@user2:luxchat.lu")
            .build()
        .node("msg-1", ActionType::SendMessage, 250.0, 350.0)
            .label("Message Équipe")
            .config("message", "👋 Bienvenue à toute l'équipe !")
            .config("format", "plain")
            .build()
        .connect("create-1", "invite-1")
        .connect("create-1", "invite-2")
        .connect("invite-1", "msg-1")
        .connect("invite-2", "msg-1")
        .build()
}
