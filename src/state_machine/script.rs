//! Canned assistant replies

use crate::flow::NodeKind;

pub fn creation_acknowledgement(prompt: &str) -> String {
    format!(
        "I'll help you build a data flow for: \"{prompt}\". Let's configure it one stage at a time."
    )
}

pub fn source_request() -> String {
    "First, where should the data come from? Tell me the data source, for example Shopify or a PostgreSQL database."
        .to_string()
}

/// Reply after the dialogue configured the stage of `kind` with `input`
pub fn stage_configured(kind: NodeKind, input: &str) -> String {
    match kind {
        NodeKind::Source => format!(
            "Great, \"{input}\" is set as the data source. How should the data be transformed before it is delivered? Describe the transformation you need."
        ),
        NodeKind::Transform => format!(
            "Got it, I'll apply \"{input}\" as the transformation. Where should the results be sent? Tell me the destination."
        ),
        NodeKind::Destination => format!(
            "Your data flow is complete! Data will be delivered to \"{input}\". Ask me about its status, run a test or start a new flow."
        ),
    }
}

pub const STATUS_REPLY: &str =
    "All stages of your data flow are configured. The source, transformation and destination are ready.";

pub const TEST_REPLY: &str =
    "Test runs are simulated here. The pipeline configuration looks consistent and is ready to execute.";

pub const RESET_REPLY: &str =
    "To start a new data flow, go back to the start screen and describe the pipeline you want to build.";

pub const HELP_REPLY: &str =
    "I can report the status of your data flow, simulate a test run, or help you start over with a new flow.";

pub const FALLBACK_REPLY: &str =
    "I understand your request. Ask me about the status of the flow, run a test, or start a new one.";
