//! Pipeline and transcript data model
//!
//! The session owns at most one [`Pipeline`] and an append-only transcript of
//! [`Message`]s. Everything here is plain data; decisions live in the state
//! machine.

mod examples;
mod message;
mod pipeline;
pub mod render;

pub use examples::{example_prompts, ExamplePrompt};
pub use message::{format_timestamp, Author, Message};
#[allow(unused_imports)] // Public API re-exports
pub use pipeline::{
    EdgeStyle, NodeConfiguration, NodeKind, NodeStatus, Pipeline, PipelineEdge, PipelineNode,
    Position,
};

/// Generate an opaque unique identifier
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
