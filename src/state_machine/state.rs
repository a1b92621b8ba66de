//! Session state, dialogue phase and intent classification

use super::script;
use crate::flow::{Message, NodeConfiguration, NodeKind, NodeStatus, Pipeline};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Session State
// ============================================================================

/// A creation request waiting for its thinking delay to elapse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCreation {
    pub ticket: u64,
    pub prompt: String,
}

/// Everything one session owns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub pipeline: Option<Pipeline>,
    pub transcript: Vec<Message>,
    pub selected_node_id: Option<String>,
    /// Set while a simulated "thinking" delay is in flight
    pub busy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_creation: Option<PendingCreation>,
    /// Last creation ticket handed out. Monotonic across resets.
    #[serde(default)]
    pub last_ticket: u64,
}

impl SessionState {
    /// Dialogue phase, or `None` before the first pipeline exists
    pub fn phase(&self) -> Option<DialoguePhase> {
        self.pipeline.as_ref().map(DialoguePhase::of)
    }
}

// ============================================================================
// Dialogue Phase
// ============================================================================

/// Which stage, if any, the scripted dialogue is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialoguePhase {
    AwaitingSource,
    AwaitingTransform,
    AwaitingDestination,
    Configured,
}

impl DialoguePhase {
    /// Derive the phase from the first pending node
    pub fn of(pipeline: &Pipeline) -> Self {
        match pipeline.first_pending().map(|node| node.kind) {
            Some(kind) => Self::awaiting(kind),
            None => DialoguePhase::Configured,
        }
    }

    fn awaiting(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Source => DialoguePhase::AwaitingSource,
            NodeKind::Transform => DialoguePhase::AwaitingTransform,
            NodeKind::Destination => DialoguePhase::AwaitingDestination,
        }
    }

    /// Stage the dialogue configures next
    pub fn pending_kind(self) -> Option<NodeKind> {
        match self {
            DialoguePhase::AwaitingSource => Some(NodeKind::Source),
            DialoguePhase::AwaitingTransform => Some(NodeKind::Transform),
            DialoguePhase::AwaitingDestination => Some(NodeKind::Destination),
            DialoguePhase::Configured => None,
        }
    }

    /// Answer one user utterance. Pure.
    pub fn respond(self, input: &str) -> Turn {
        let Some(kind) = self.pending_kind() else {
            let intent = Intent::classify(input);
            return Turn {
                next_phase: DialoguePhase::Configured,
                mutation: None,
                intent: Some(intent),
                reply: intent.reply().to_string(),
            };
        };

        let next_phase = match kind {
            NodeKind::Source => DialoguePhase::AwaitingTransform,
            NodeKind::Transform => DialoguePhase::AwaitingDestination,
            NodeKind::Destination => DialoguePhase::Configured,
        };

        Turn {
            next_phase,
            mutation: Some(NodeMutation::configure(kind, input)),
            intent: None,
            reply: script::stage_configured(kind, input),
        }
    }
}

/// Outcome of one dialogue step
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    #[allow(dead_code)] // Used by tests
    pub next_phase: DialoguePhase,
    pub mutation: Option<NodeMutation>,
    /// Set only once the pipeline is fully configured
    #[allow(dead_code)] // Used by tests
    pub intent: Option<Intent>,
    pub reply: String,
}

/// Update the dialogue applies to the node of `kind`
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMutation {
    pub kind: NodeKind,
    pub label: String,
    pub status: NodeStatus,
    /// Entries merged into the node's configuration
    pub configuration: NodeConfiguration,
}

impl NodeMutation {
    fn configure(kind: NodeKind, input: &str) -> Self {
        let mut configuration = NodeConfiguration::new();
        configuration.insert(kind.config_key().to_string(), Value::from(input));
        Self {
            kind,
            label: input.to_string(),
            status: kind.configured_status(),
            configuration,
        }
    }
}

// ============================================================================
// Intent Classification
// ============================================================================

/// Category of a message sent after the pipeline is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StatusInquiry,
    TestInquiry,
    ResetInquiry,
    HelpInquiry,
    Fallback,
}

/// Keyword table in priority order; the first category with a hit wins
const INTENT_KEYWORDS: [(Intent, &[&str]); 4] = [
    (Intent::StatusInquiry, &["status", "complete", "done"]),
    (Intent::TestInquiry, &["test", "run", "execute"]),
    (Intent::ResetInquiry, &["new", "start over", "reset"]),
    (Intent::HelpInquiry, &["help", "what", "how"]),
];

impl Intent {
    /// Case-insensitive substring match against the keyword table
    pub fn classify(text: &str) -> Self {
        let lowered = text.to_lowercase();
        INTENT_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map_or(Intent::Fallback, |(intent, _)| *intent)
    }

    pub fn reply(self) -> &'static str {
        match self {
            Intent::StatusInquiry => script::STATUS_REPLY,
            Intent::TestInquiry => script::TEST_REPLY,
            Intent::ResetInquiry => script::RESET_REPLY,
            Intent::HelpInquiry => script::HELP_REPLY,
            Intent::Fallback => script::FALLBACK_REPLY,
        }
    }
}
