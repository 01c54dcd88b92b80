use crate::compiler::loader;
use crate::dsl::{ActionType, GraphEdge, GraphNode, NodeConfig, Position, Workflow, DEFAULT_WORKFLOW_NAME};
use crate::error::StoreError;
use crate::nodes;
use crate::runtime::ids::{IdGenerator, UuidIds};
use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Suffix appended to the name of a duplicated workflow.
pub const COPY_SUFFIX: &str = " (Copie)";

/// Maps a point reported by the editing surface into canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left corner of the canvas element on screen.
    pub origin: Position,
    pub pan: Position,
    pub zoom: f64,
}

impl Viewport {
    pub fn project(&self, screen: Position) -> Position {
        Position {
            x: (screen.x - self.origin.x - self.pan.x) / self.zoom,
            y: (screen.y - self.origin.y - self.pan.y) / self.zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Position::default(),
            pan: Position::default(),
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub actions: usize,
    pub connections: usize,
}

/// The workflow being edited. Every operation applies immediately; there is
/// no undo and no transaction.
pub struct GraphStore {
    name: String,
    description: Option<String>,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    selected: Option<String>,
    ids: Box<dyn IdGenerator>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    pub fn with_ids(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            name: DEFAULT_WORKFLOW_NAME.to_string(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            selected: None,
            ids,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            actions: self.nodes.len(),
            connections: self.edges.len(),
        }
    }

    /// Appends a node with an empty config and the registry label.
    /// Returns the new node id.
    pub fn create_node(&mut self, kind: ActionType, position: Position) -> Result<String, StoreError> {
        let Some(meta) = nodes::lookup(&kind) else {
            warn!(kind = %kind, "Refusing to create node of unknown type");
            return Err(StoreError::UnknownActionType(kind.to_string()));
        };
        // JSON has no encoding for these, so the export would not re-import.
        if !position.x.is_finite() || !position.y.is_finite() {
            warn!(x = position.x, y = position.y, "Refusing to create node at non-finite position");
            return Err(StoreError::InvalidPosition {
                x: position.x,
                y: position.y,
            });
        }

        let id = format!("{}-{}", kind, self.ids.next_suffix());
        debug!(node_id = %id, x = position.x, y = position.y, "Creating node");
        self.nodes.push(GraphNode::new(id.clone(), kind, position, meta.label));
        Ok(id)
    }

    /// Palette click: the node lands somewhere in the visible area.
    pub fn add_node(&mut self, kind: ActionType) -> Result<String, StoreError> {
        let mut rng = rand::thread_rng();
        let position = Position::new(rng.gen_range(100.0..500.0), rng.gen_range(100.0..500.0));
        self.create_node(kind, position)
    }

    /// Palette drag-and-drop. `type_name` is the raw identifier carried by the drag.
    pub fn drop_node(&mut self, type_name: &str, screen: Position, viewport: &Viewport) -> Result<String, StoreError> {
        let kind: ActionType = type_name.parse()?;
        self.create_node(kind, viewport.project(screen))
    }

    pub fn select_node(&mut self, id: &str) -> Result<&GraphNode, StoreError> {
        let node = self
            .nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?;
        self.selected = Some(node.id.clone());
        Ok(node)
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selected.as_deref().and_then(|id| self.node(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Whole-config replace. Merging with the previous config is up to the caller.
    pub fn update_node_config(&mut self, id: &str, config: NodeConfig) -> Result<(), StoreError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?;
        node.data.config = config;
        Ok(())
    }

    /// Single-field edit from the configuration panel.
    pub fn set_config_field(&mut self, id: &str, key: &str, value: impl Into<Value>) -> Result<(), StoreError> {
        let config = self
            .node(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?
            .config()
            .clone()
            .with(key, value);
        self.update_node_config(id, config)
    }

    /// Appends an edge. Endpoints are not checked: self-loops, parallel
    /// edges and edges to unknown ids are all accepted.
    pub fn connect(&mut self, source: &str, target: &str) -> String {
        let id = format!("edge-{}", self.ids.next_suffix());
        debug!(edge_id = %id, source, target, "Connecting nodes");
        self.edges.push(GraphEdge::new(id.clone(), source, target));
        id
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<GraphNode, StoreError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?;
        let node = self.nodes.remove(index);

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }

        debug!(node_id = %id, removed_edges = before - self.edges.len(), "Removed node");
        Ok(node)
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<GraphEdge, StoreError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::EdgeNotFound(id.to_string()))?;
        Ok(self.edges.remove(index))
    }

    /// Replaces the whole graph. Referential integrity is the importer's job.
    pub fn load_workflow(&mut self, workflow: Workflow) {
        info!(name = %workflow.name, nodes = workflow.nodes.len(), edges = workflow.edges.len(), "Loading workflow");
        self.name = workflow.name;
        self.description = workflow.description;
        self.nodes = workflow.nodes;
        self.edges = workflow.edges;

        let stale = self
            .selected
            .as_deref()
            .is_some_and(|id| !self.nodes.iter().any(|n| n.id == id));
        if stale {
            self.selected = None;
        }
    }

    /// Copy of the current graph under fresh node and edge ids, with edge
    /// endpoints remapped. Endpoints naming no node are left untouched.
    pub fn duplicate(&mut self) -> Workflow {
        let mut id_map: HashMap<String, String> = HashMap::new();

        let nodes: Vec<GraphNode> = self
            .nodes
            .iter()
            .map(|node| {
                let new_id = format!("{}-{}", node.kind, self.ids.next_suffix());
                id_map.insert(node.id.clone(), new_id.clone());
                GraphNode {
                    id: new_id,
                    ..node.clone()
                }
            })
            .collect();

        let remap = |id: &String| id_map.get(id).cloned().unwrap_or_else(|| id.clone());
        let edges: Vec<GraphEdge> = self
            .edges
            .iter()
            .map(|edge| GraphEdge {
                id: format!("edge-{}", self.ids.next_suffix()),
                source: remap(&edge.source),
                target: remap(&edge.target),
                extra: edge.extra.clone(),
            })
            .collect();

        Workflow {
            name: format!("{}{}", self.name, COPY_SUFFIX),
            description: self.description.clone(),
            nodes,
            edges,
            ..Workflow::default()
        }
    }

    /// Export document of the current graph, stamped now.
    pub fn export(&mut self) -> Workflow {
        let id = format!("workflow-{}", self.ids.next_suffix());
        loader::export_workflow(id, &self.name, &self.nodes, &self.edges, Utc::now())
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
