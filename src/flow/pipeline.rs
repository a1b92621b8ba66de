//! Pipeline graph types

use super::generate_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form node attributes (`source`, `transformation`, `name`, ...)
pub type NodeConfiguration = BTreeMap<String, Value>;

const TITLE_MAX_CHARS: usize = 48;

// ============================================================================
// Node kind and status
// ============================================================================

/// Pipeline stage. Fixed at node creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Source,
    Transform,
    Destination,
}

impl NodeKind {
    /// Stages in configuration order
    pub const ALL: [NodeKind; 3] = [NodeKind::Source, NodeKind::Transform, NodeKind::Destination];

    /// Configuration key written when the dialogue configures this stage
    pub fn config_key(self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Transform => "transformation",
            NodeKind::Destination => "destination",
        }
    }

    /// Label shown until the user names the stage
    pub fn placeholder_label(self) -> &'static str {
        match self {
            NodeKind::Source => "Data Source",
            NodeKind::Transform => "Transform",
            NodeKind::Destination => "Destination",
        }
    }

    /// Status a node reaches once the dialogue has configured it
    pub fn configured_status(self) -> NodeStatus {
        match self {
            NodeKind::Source | NodeKind::Transform => NodeStatus::Partial,
            NodeKind::Destination => NodeStatus::Complete,
        }
    }

    /// Color tag used by the diagram renderer
    pub fn color(self) -> &'static str {
        match self {
            NodeKind::Source => "blue",
            NodeKind::Transform => "purple",
            NodeKind::Destination => "green",
        }
    }

    fn default_position(self) -> Position {
        let x = match self {
            NodeKind::Source => 100.0,
            NodeKind::Transform => 400.0,
            NodeKind::Destination => 700.0,
        };
        Position { x, y: 200.0 }
    }
}

/// Configuration progress of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Pending,
    Partial,
    Complete,
    Error,
}

impl NodeStatus {
    pub fn is_pending(self) -> bool {
        self == NodeStatus::Pending
    }

    /// Color tag used by the diagram renderer
    pub fn color(self) -> &'static str {
        match self {
            NodeStatus::Pending => "orange",
            NodeStatus::Partial => "blue",
            NodeStatus::Complete => "green",
            NodeStatus::Error => "red",
        }
    }
}

// ============================================================================
// Graph elements
// ============================================================================

/// Layout coordinate. Only meaningful to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: String,
    pub kind: NodeKind,
    pub status: NodeStatus,
    pub label: String,
    #[serde(default)]
    pub configuration: NodeConfiguration,
    pub position: Position,
}

impl PipelineNode {
    fn placeholder(kind: NodeKind) -> Self {
        Self {
            id: generate_id(),
            kind,
            status: NodeStatus::Pending,
            label: kind.placeholder_label().to_string(),
            configuration: NodeConfiguration::new(),
            position: kind.default_position(),
        }
    }
}

/// Visual style tag of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    Animated,
}

/// Directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub style: EdgeStyle,
}

impl PipelineEdge {
    fn connect(source: &PipelineNode, target: &PipelineNode) -> Self {
        Self {
            id: generate_id(),
            source_node_id: source.id.clone(),
            target_node_id: target.id.clone(),
            style: EdgeStyle::Animated,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// The three-stage flow diagram
///
/// Nodes and edges are created together; afterwards only node status, label,
/// configuration and position change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub title: String,
    /// The prompt the pipeline was created from
    pub description: String,
    pub nodes: Vec<PipelineNode>,
    pub edges: Vec<PipelineEdge>,
}

impl Pipeline {
    /// Build a fresh, unconfigured pipeline for a prompt
    pub fn from_prompt(prompt: &str) -> Self {
        let nodes: Vec<PipelineNode> = NodeKind::ALL
            .iter()
            .map(|kind| PipelineNode::placeholder(*kind))
            .collect();
        let edges = nodes
            .windows(2)
            .map(|pair| PipelineEdge::connect(&pair[0], &pair[1]))
            .collect();

        Self {
            id: generate_id(),
            title: shorten_title(prompt),
            description: prompt.to_string(),
            nodes,
            edges,
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut PipelineNode> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    pub fn node_of_kind(&self, kind: NodeKind) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    pub fn node_of_kind_mut(&mut self, kind: NodeKind) -> Option<&mut PipelineNode> {
        self.nodes.iter_mut().find(|n| n.kind == kind)
    }

    /// First node, in configuration order, still waiting for the dialogue
    pub fn first_pending(&self) -> Option<&PipelineNode> {
        NodeKind::ALL
            .iter()
            .filter_map(|kind| self.node_of_kind(*kind))
            .find(|node| node.status.is_pending())
    }
}

fn shorten_title(prompt: &str) -> String {
    if prompt.chars().count() <= TITLE_MAX_CHARS {
        return prompt.to_string();
    }
    let mut title: String = prompt.chars().take(TITLE_MAX_CHARS - 1).collect();
    title.truncate(title.trim_end().len());
    title.push('…');
    title
}
