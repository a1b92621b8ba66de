//! API request and response types

use crate::flow::{ExamplePrompt, NodeConfiguration, NodeStatus};
use serde::{Deserialize, Serialize};

/// Request to build a pipeline from a prompt
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub text: String,
}

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Request to change the selected node; absent or null clears it
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub node_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: NodeStatus,
}

#[derive(Debug, Deserialize)]
pub struct ConfigurationRequest {
    pub configuration: NodeConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub x: f64,
    pub y: f64,
}

/// Response for a newly created session
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
}

/// Response for session commands
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// False when the command was a no-op
    pub applied: bool,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ExamplesResponse {
    pub examples: &'static [ExamplePrompt],
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
