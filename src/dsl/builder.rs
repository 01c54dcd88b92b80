use crate::dsl::{ActionType, GraphEdge, GraphNode, NodeConfig, Position, Workflow};
use crate::nodes;
use serde_json::Value;

pub struct WorkflowBuilder {
    id: String,
    name: String,
    description: Option<String>,
    pub nodes: Vec<GraphNode>, // public so tests can tamper with the graph before build
    edges: Vec<GraphEdge>,
}

impl WorkflowBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Starts a node; finish it with `NodeBuilder::build`.
    pub fn node(self, id: &str, kind: ActionType, x: f64, y: f64) -> NodeBuilder {
        NodeBuilder {
            workflow_builder: self,
            id: id.to_string(),
            kind,
            position: Position::new(x, y),
            label: None,
            config: NodeConfig::new(),
        }
    }

    /// Connects two nodes with an edge named `e{n}`, n counting from 1.
    pub fn connect(self, source: &str, target: &str) -> Self {
        let id = format!("e{}", self.edges.len() + 1);
        self.connect_with_id(&id, source, target)
    }

    pub fn connect_with_id(mut self, id: &str, source: &str, target: &str) -> Self {
        self.edges.push(GraphEdge::new(id, source, target));
        self
    }

    pub fn build(self) -> Workflow {
        Workflow {
            id: self.id,
            name: self.name,
            description: self.description,
            nodes: self.nodes,
            edges: self.edges,
            created_at: None,
            updated_at: None,
        }
    }
}

pub struct NodeBuilder {
    workflow_builder: WorkflowBuilder,
    id: String,
    kind: ActionType,
    position: Position,
    label: Option<String>,
    config: NodeConfig,
}

impl NodeBuilder {
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn config(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.config.set(key, value);
        self
    }

    pub fn build(mut self) -> WorkflowBuilder {
        // Fall back to the registry label, as a palette click would.
        let label = self.label.unwrap_or_else(|| {
            nodes::lookup(&self.kind)
                .map(|meta| meta.label.to_string())
                .unwrap_or_else(|| self.kind.to_string())
        });
        let mut node = GraphNode::new(self.id, self.kind, self.position, label);
        node.data.config = self.config;
        self.workflow_builder.nodes.push(node);
        self.workflow_builder
    }
}
