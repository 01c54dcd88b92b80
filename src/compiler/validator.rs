use crate::dsl::Workflow;
use crate::nodes::config::{self, ConfigIssue};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Non-fatal finding from the validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The edge was dropped.
    DanglingEdgeReference { edge_id: String, missing: Vec<String> },
    UnknownActionType { node_id: String, kind: String },
    DuplicateNodeId { node_id: String },
    DuplicateEdgeId { edge_id: String },
    InvalidConfig { node_id: String, issue: ConfigIssue },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdgeReference { edge_id, missing } => {
                write!(f, "edge {edge_id} dropped: unknown node(s) {}", missing.join(", "))
            }
            Self::UnknownActionType { node_id, kind } => {
                write!(f, "node {node_id} has unknown action type `{kind}`")
            }
            Self::DuplicateNodeId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::DuplicateEdgeId { edge_id } => write!(f, "duplicate edge id {edge_id}"),
            Self::InvalidConfig { node_id, issue } => write!(f, "node {node_id}: {issue}"),
        }
    }
}

pub struct Validated {
    pub workflow: Workflow,
    pub issues: Vec<ValidationIssue>,
}

/// Post-parse pass over an imported workflow. Only dangling edges are
/// removed; everything else is reported and left in place. Holds no state
/// between documents.
#[derive(Debug, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, mut workflow: Workflow) -> Validated {
        let mut issues = Vec::new();
        let mut node_ids: HashSet<String> = HashSet::new();

        // 1. Index nodes
        for node in &workflow.nodes {
            if !node_ids.insert(node.id.clone()) {
                issues.push(ValidationIssue::DuplicateNodeId {
                    node_id: node.id.clone(),
                });
            }
            if !node.kind.is_known() {
                issues.push(ValidationIssue::UnknownActionType {
                    node_id: node.id.clone(),
                    kind: node.kind.to_string(),
                });
            }
            for issue in config::check_config(&node.kind, node.config()) {
                issues.push(ValidationIssue::InvalidConfig {
                    node_id: node.id.clone(),
                    issue,
                });
            }
        }

        // 2. Edges: duplicates are reported, dangling ones dropped
        let mut edge_ids = HashSet::new();
        let mut kept = Vec::with_capacity(workflow.edges.len());
        for edge in workflow.edges {
            if !edge_ids.insert(edge.id.clone()) {
                issues.push(ValidationIssue::DuplicateEdgeId {
                    edge_id: edge.id.clone(),
                });
            }

            let mut missing: Vec<String> = [&edge.source, &edge.target]
                .into_iter()
                .filter(|id| !node_ids.contains(id.as_str()))
                .cloned()
                .collect();
            missing.dedup(); // self-loop on a missing node

            if missing.is_empty() {
                kept.push(edge);
            } else {
                warn!(edge_id = %edge.id, missing = ?missing, "Dropping dangling edge");
                issues.push(ValidationIssue::DanglingEdgeReference {
                    edge_id: edge.id,
                    missing,
                });
            }
        }
        workflow.edges = kept;

        Validated { workflow, issues }
    }
}
