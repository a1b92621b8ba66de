//! State transition function
//!
//! Given the same state and event this always produces the same state shape
//! and effects; the only inputs it does not control are freshly generated ids
//! and message timestamps. No I/O happens here.

use super::script;
use super::state::{DialoguePhase, NodeMutation, PendingCreation, SessionState};
use super::{Effect, Event};
use crate::flow::{Message, Pipeline, PipelineNode};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Reasons a command leaves the session untouched
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("No pipeline exists yet")]
    NoPipeline,
    #[error("Node not found: {0}")]
    UnknownNode(String),
    #[error("Thinking delay {0} no longer matches a pending request")]
    StaleThinking(u64),
}

/// Apply one event to the session state
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::CreateFromPrompt { prompt } => create_from_prompt(state, &prompt),
        Event::ThinkingElapsed { ticket } => complete_creation(state, ticket),
        Event::UserInput { text } => process_user_input(state, &text),

        Event::SelectNode { node_id } => {
            let mut new_state = state.clone();
            new_state.selected_node_id = node_id;
            Ok(TransitionResult::new(new_state).with_effect(Effect::NotifySelection))
        }

        Event::UpdateNodeStatus { node_id, status } => {
            update_node(state, &node_id, |node| node.status = status)
        }
        Event::UpdateNodeConfiguration {
            node_id,
            configuration,
        } => update_node(state, &node_id, |node| node.configuration = configuration),
        Event::UpdateNodePosition { node_id, position } => {
            update_node(state, &node_id, |node| node.position = position)
        }

        Event::Reset => {
            let new_state = SessionState {
                last_ticket: state.last_ticket,
                ..SessionState::default()
            };
            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::CancelThinking)
                .with_effect(Effect::NotifySnapshot))
        }
    }
}

fn create_from_prompt(
    state: &SessionState,
    prompt: &str,
) -> Result<TransitionResult, TransitionError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(TransitionError::EmptyInput);
    }

    let ticket = state.last_ticket + 1;
    let mut new_state = state.clone();
    new_state.last_ticket = ticket;
    new_state.busy = true;
    let superseded = new_state
        .pending_creation
        .replace(PendingCreation {
            ticket,
            prompt: prompt.to_string(),
        })
        .is_some();

    let mut result = TransitionResult::new(new_state);
    if superseded {
        result = result.with_effect(Effect::CancelThinking);
    }
    Ok(result
        .with_effect(Effect::ScheduleThinking { ticket })
        .with_effect(Effect::NotifyBusy))
}

/// The thinking delay elapsed: the new pipeline replaces the session wholesale
fn complete_creation(state: &SessionState, ticket: u64) -> Result<TransitionResult, TransitionError> {
    let pending = state
        .pending_creation
        .as_ref()
        .filter(|pending| pending.ticket == ticket)
        .ok_or(TransitionError::StaleThinking(ticket))?;

    let new_state = SessionState {
        pipeline: Some(Pipeline::from_prompt(&pending.prompt)),
        transcript: vec![
            Message::assistant(script::creation_acknowledgement(&pending.prompt)),
            Message::assistant(script::source_request()),
        ],
        selected_node_id: None,
        busy: false,
        pending_creation: None,
        last_ticket: state.last_ticket,
    };

    Ok(TransitionResult::new(new_state).with_effect(Effect::NotifySnapshot))
}

/// Append the user's message and the dialogue's reply.
///
/// Busy is recomputed rather than cleared: a creation still waiting for its
/// thinking delay keeps the session busy (see "ProcessUserInput during
/// thinking" in DESIGN.md).
fn process_user_input(state: &SessionState, text: &str) -> Result<TransitionResult, TransitionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TransitionError::EmptyInput);
    }
    let pipeline = state.pipeline.as_ref().ok_or(TransitionError::NoPipeline)?;

    let turn = DialoguePhase::of(pipeline).respond(text);

    let mut new_state = state.clone();
    let user_message = Message::user(text);
    let reply = Message::assistant(turn.reply);
    new_state.transcript.push(user_message.clone());
    new_state.transcript.push(reply.clone());

    let mut effects = vec![Effect::notify_message(&user_message)];
    if let Some(mutation) = turn.mutation {
        if let Some(pipeline) = new_state.pipeline.as_mut() {
            apply_mutation(pipeline, mutation);
        }
        effects.push(Effect::NotifyPipeline);
    }
    effects.push(Effect::notify_message(&reply));

    // A creation still in flight keeps the session busy
    new_state.busy = new_state.pending_creation.is_some();
    if new_state.busy != state.busy {
        effects.push(Effect::NotifyBusy);
    }

    Ok(TransitionResult::new(new_state).with_effects(effects))
}

fn apply_mutation(pipeline: &mut Pipeline, mutation: NodeMutation) {
    if let Some(node) = pipeline.node_of_kind_mut(mutation.kind) {
        node.label = mutation.label;
        node.status = mutation.status;
        node.configuration.extend(mutation.configuration);
    }
}

fn update_node(
    state: &SessionState,
    node_id: &str,
    update: impl FnOnce(&mut PipelineNode),
) -> Result<TransitionResult, TransitionError> {
    let pipeline = state.pipeline.as_ref().ok_or(TransitionError::NoPipeline)?;
    if pipeline.node(node_id).is_none() {
        return Err(TransitionError::UnknownNode(node_id.to_string()));
    }

    let mut new_state = state.clone();
    if let Some(node) = new_state
        .pipeline
        .as_mut()
        .and_then(|pipeline| pipeline.node_mut(node_id))
    {
        update(node);
    }
    Ok(TransitionResult::new(new_state).with_effect(Effect::NotifyPipeline))
}
