//! Session runtime executor

use super::traits::ThinkingTimer;
use super::{Command, SessionEvent, SessionSnapshot};

use crate::flow::render::{DiagramView, MessageView};
use crate::state_machine::{transition, Effect, Event, SessionState};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns one session's state and applies its commands in order
pub struct SessionRuntime<T>
where
    T: ThinkingTimer + ?Sized + 'static,
{
    session_id: String,
    state: SessionState,
    timer: Arc<T>,
    command_rx: mpsc::Receiver<Command>,
    /// Used by the thinking task to report back; weak so that dropping
    /// every handle stops the runtime
    command_tx: mpsc::WeakSender<Command>,
    state_tx: watch::Sender<SessionState>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    /// Token to cancel the thinking delay in flight
    thinking_cancel_token: Option<CancellationToken>,
}

impl<T> SessionRuntime<T>
where
    T: ThinkingTimer + ?Sized + 'static,
{
    pub fn new(
        session_id: String,
        timer: Arc<T>,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::WeakSender<Command>,
        state_tx: watch::Sender<SessionState>,
        broadcast_tx: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            session_id,
            state: SessionState::default(),
            timer,
            command_rx,
            command_tx,
            state_tx,
            broadcast_tx,
            thinking_cancel_token: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        while let Some(command) = self.command_rx.recv().await {
            self.process_command(command);
        }

        self.cancel_thinking();
        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
    }

    fn process_command(&mut self, command: Command) {
        let Command { event, ack } = command;
        let event_name = event.name();

        let applied = match transition(&self.state, event) {
            Ok(result) => {
                self.state = result.new_state;
                // Publish before notifying so subscribers that query see the new state
                self.state_tx.send_replace(self.state.clone());
                for effect in result.effects {
                    self.execute_effect(effect);
                }
                true
            }
            Err(e) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    event = event_name,
                    reason = %e,
                    "Command ignored"
                );
                false
            }
        };

        if let Some(ack) = ack {
            let _ = ack.send(applied);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleThinking { ticket } => self.schedule_thinking(ticket),

            Effect::CancelThinking => self.cancel_thinking(),

            Effect::NotifyMessage { message } => {
                let _ = self.broadcast_tx.send(SessionEvent::Message {
                    message: MessageView::from(&message),
                });
            }

            Effect::NotifyPipeline => {
                let _ = self.broadcast_tx.send(SessionEvent::Diagram {
                    diagram: DiagramView::from_pipeline(self.state.pipeline.as_ref()),
                });
            }

            Effect::NotifySelection => {
                let _ = self.broadcast_tx.send(SessionEvent::Selection {
                    node_id: self.state.selected_node_id.clone(),
                });
            }

            Effect::NotifyBusy => {
                let _ = self.broadcast_tx.send(SessionEvent::Busy {
                    busy: self.state.busy,
                });
            }

            Effect::NotifySnapshot => {
                let _ = self.broadcast_tx.send(SessionEvent::Snapshot {
                    snapshot: Box::new(SessionSnapshot::from(&self.state)),
                });
            }
        }
    }

    /// Spawn the thinking delay; when it elapses the runtime receives
    /// `ThinkingElapsed` like any other command
    fn schedule_thinking(&mut self, ticket: u64) {
        self.cancel_thinking();

        let token = CancellationToken::new();
        self.thinking_cancel_token = Some(token.clone());

        let timer = Arc::clone(&self.timer);
        let command_tx = self.command_tx.clone();
        let session_id = self.session_id.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(session_id = %session_id, ticket, "Thinking cancelled");
                }
                () = timer.wait() => {
                    if let Some(command_tx) = command_tx.upgrade() {
                        let event = Event::ThinkingElapsed { ticket };
                        let _ = command_tx.send(Command::internal(event)).await;
                    }
                }
            }
        });
    }

    fn cancel_thinking(&mut self) {
        if let Some(token) = self.thinking_cancel_token.take() {
            token.cancel();
        }
    }
}
