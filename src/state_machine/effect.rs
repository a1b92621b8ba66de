//! Effects produced by state transitions

use crate::flow::Message;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the thinking delay for a creation request
    ScheduleThinking { ticket: u64 },

    /// Abort the thinking delay in flight, if any
    CancelThinking,

    /// A message was appended to the transcript
    NotifyMessage { message: Message },

    /// Pipeline nodes changed
    NotifyPipeline,

    /// The selected node changed
    NotifySelection,

    /// The busy flag changed
    NotifyBusy,

    /// State was replaced wholesale; clients should reload everything
    NotifySnapshot,
}

impl Effect {
    pub fn notify_message(message: &Message) -> Self {
        Effect::NotifyMessage {
            message: message.clone(),
        }
    }
}
