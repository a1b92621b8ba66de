//! Runtime for executing sessions
//!
//! Each session runs as one task that owns its `SessionState`. Commands are
//! applied strictly in arrival order; queries read the last published state.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::flow::render::{DiagramView, MessageView};
use crate::flow::{Message, NodeConfiguration, NodeStatus, Pipeline, Position};
use crate::state_machine::{DialoguePhase, Event, SessionState};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch, RwLock};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Session runtime stopped")]
    RuntimeStopped,
}

/// A command queued for a session runtime
#[derive(Debug)]
pub struct Command {
    pub event: Event,
    /// Resolves to whether the command changed the session
    pub ack: Option<oneshot::Sender<bool>>,
}

impl Command {
    /// Command raised by the runtime itself; nobody waits for it
    pub fn internal(event: Event) -> Self {
        Self { event, ack: None }
    }
}

/// Read-only view of a session, as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub pipeline: Option<Pipeline>,
    pub transcript: Vec<Message>,
    pub selected_node_id: Option<String>,
    pub busy: bool,
    pub phase: Option<DialoguePhase>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        Self {
            pipeline: state.pipeline.clone(),
            transcript: state.transcript.clone(),
            selected_node_id: state.selected_node_id.clone(),
            busy: state.busy,
            phase: state.phase(),
        }
    }
}

/// Events sent to subscribed clients
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Message { message: MessageView },
    Diagram { diagram: DiagramView },
    Selection { node_id: Option<String> },
    Busy { busy: bool },
    /// The whole session was replaced (new pipeline or reset)
    Snapshot { snapshot: Box<SessionSnapshot> },
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    command_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<SessionState>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Queue an event and wait until the runtime has applied it
    pub async fn dispatch(&self, event: Event) -> Result<bool, RuntimeError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(Command {
                event,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| RuntimeError::RuntimeStopped)?;
        ack_rx.await.map_err(|_| RuntimeError::RuntimeStopped)
    }

    // ==================== Commands ====================

    pub async fn create_from_prompt(&self, prompt: impl Into<String>) -> Result<bool, RuntimeError> {
        self.dispatch(Event::CreateFromPrompt {
            prompt: prompt.into(),
        })
        .await
    }

    pub async fn process_user_input(&self, text: impl Into<String>) -> Result<bool, RuntimeError> {
        self.dispatch(Event::UserInput { text: text.into() }).await
    }

    pub async fn select_node(&self, node_id: Option<String>) -> Result<bool, RuntimeError> {
        self.dispatch(Event::SelectNode { node_id }).await
    }

    pub async fn update_node_status(
        &self,
        node_id: impl Into<String>,
        status: NodeStatus,
    ) -> Result<bool, RuntimeError> {
        self.dispatch(Event::UpdateNodeStatus {
            node_id: node_id.into(),
            status,
        })
        .await
    }

    pub async fn update_node_configuration(
        &self,
        node_id: impl Into<String>,
        configuration: NodeConfiguration,
    ) -> Result<bool, RuntimeError> {
        self.dispatch(Event::UpdateNodeConfiguration {
            node_id: node_id.into(),
            configuration,
        })
        .await
    }

    pub async fn update_node_position(
        &self,
        node_id: impl Into<String>,
        position: Position,
    ) -> Result<bool, RuntimeError> {
        self.dispatch(Event::UpdateNodePosition {
            node_id: node_id.into(),
            position,
        })
        .await
    }

    pub async fn reset(&self) -> Result<bool, RuntimeError> {
        self.dispatch(Event::Reset).await
    }

    // ==================== Queries ====================

    #[allow(dead_code)] // Used by tests
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*self.state_rx.borrow())
    }

    pub fn pipeline(&self) -> Option<Pipeline> {
        self.state_rx.borrow().pipeline.clone()
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.state_rx.borrow().transcript.clone()
    }

    pub fn selected_node_id(&self) -> Option<String> {
        self.state_rx.borrow().selected_node_id.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state_rx.borrow().busy
    }

    /// Receiver that observes every published state
    #[allow(dead_code)] // Used by tests
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.broadcast_tx.subscribe()
    }
}

/// Start a runtime task for a new, empty session
pub fn spawn_session<T>(session_id: impl Into<String>, timer: Arc<T>) -> SessionHandle
where
    T: ThinkingTimer + ?Sized + 'static,
{
    let session_id = session_id.into();
    let (command_tx, command_rx) = mpsc::channel(32);
    let (state_tx, state_rx) = watch::channel(SessionState::default());
    let (broadcast_tx, _) = broadcast::channel(128);

    let runtime = SessionRuntime::new(
        session_id.clone(),
        timer,
        command_rx,
        command_tx.downgrade(),
        state_tx,
        broadcast_tx.clone(),
    );
    tokio::spawn(runtime.run());

    SessionHandle {
        session_id,
        command_tx,
        state_rx,
        broadcast_tx,
    }
}

/// Manager for all session runtimes
pub struct SessionManager {
    timer: Arc<dyn ThinkingTimer>,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    pub fn new(timer: Arc<dyn ThinkingTimer>) -> Self {
        Self {
            timer,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session and return its handle
    pub async fn create_session(&self) -> SessionHandle {
        let session_id = crate::flow::generate_id();
        let handle = spawn_session(session_id.clone(), Arc::clone(&self.timer));

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.clone(), handle.clone());
        tracing::info!(session_id = %session_id, active = sessions.len(), "Session created");
        handle
    }

    pub async fn get(&self, session_id: &str) -> Result<SessionHandle, RuntimeError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.to_string()))
    }

    /// Forget a session. Its runtime stops once outstanding handles are dropped.
    pub async fn remove(&self, session_id: &str) -> Result<(), RuntimeError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_none() {
            return Err(RuntimeError::SessionNotFound(session_id.to_string()));
        }
        tracing::info!(session_id = %session_id, active = sessions.len(), "Session removed");
        Ok(())
    }
}
