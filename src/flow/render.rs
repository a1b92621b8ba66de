//! Render contracts handed to the diagram and transcript displays

use super::{
    format_timestamp, Author, EdgeStyle, Message, NodeKind, NodeStatus, Pipeline, Position,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub kind: NodeKind,
    pub status: NodeStatus,
    pub label: String,
    pub position: Position,
    pub kind_color: &'static str,
    pub status_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub style: EdgeStyle,
}

/// What the diagram renderer draws. Empty when no pipeline exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagramView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl DiagramView {
    pub fn from_pipeline(pipeline: Option<&Pipeline>) -> Self {
        let Some(pipeline) = pipeline else {
            return Self::default();
        };

        let nodes = pipeline
            .nodes
            .iter()
            .map(|node| NodeView {
                id: node.id.clone(),
                kind: node.kind,
                status: node.status,
                label: node.label.clone(),
                position: node.position,
                kind_color: node.kind.color(),
                status_color: node.status.color(),
            })
            .collect();

        let edges = pipeline
            .edges
            .iter()
            .map(|edge| EdgeView {
                id: edge.id.clone(),
                source_node_id: edge.source_node_id.clone(),
                target_node_id: edge.target_node_id.clone(),
                style: edge.style,
            })
            .collect();

        Self { nodes, edges }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub id: String,
    pub author: Author,
    /// User messages render on the right
    pub is_user: bool,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Local `HH:MM`
    pub display_time: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            author: message.author,
            is_user: message.is_user(),
            content: message.content.clone(),
            timestamp: message.timestamp,
            display_time: format_timestamp(&message.timestamp),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranscriptView {
    pub messages: Vec<MessageView>,
}

impl TranscriptView {
    pub fn from_messages(messages: &[Message]) -> Self {
        Self {
            messages: messages.iter().map(MessageView::from).collect(),
        }
    }
}
