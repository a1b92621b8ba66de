//! Commands that drive a session

use crate::flow::{NodeConfiguration, NodeStatus, Position};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Dialogue
    CreateFromPrompt {
        prompt: String,
    },
    /// The thinking delay scheduled for `ticket` has elapsed
    ThinkingElapsed {
        ticket: u64,
    },
    UserInput {
        text: String,
    },

    // Inspection, reported by the diagram renderer or a properties panel
    SelectNode {
        node_id: Option<String>,
    },
    UpdateNodeStatus {
        node_id: String,
        status: NodeStatus,
    },
    UpdateNodeConfiguration {
        node_id: String,
        configuration: NodeConfiguration,
    },
    UpdateNodePosition {
        node_id: String,
        position: Position,
    },

    Reset,
}

impl Event {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::CreateFromPrompt { .. } => "create_from_prompt",
            Event::ThinkingElapsed { .. } => "thinking_elapsed",
            Event::UserInput { .. } => "user_input",
            Event::SelectNode { .. } => "select_node",
            Event::UpdateNodeStatus { .. } => "update_node_status",
            Event::UpdateNodeConfiguration { .. } => "update_node_configuration",
            Event::UpdateNodePosition { .. } => "update_node_position",
            Event::Reset => "reset",
        }
    }
}
