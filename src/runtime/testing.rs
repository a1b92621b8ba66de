//! Mock timers and runtime integration tests
//!
//! These mocks make the thinking delay deterministic.

use super::traits::ThinkingTimer;
use async_trait::async_trait;
use tokio::sync::Semaphore;

// ============================================================================
// Mock Timers
// ============================================================================

/// Timer that elapses immediately
pub struct ImmediateTimer;

#[async_trait]
impl ThinkingTimer for ImmediateTimer {
    async fn wait(&self) {}
}

/// Timer that elapses only when the test releases it, one wait per release
pub struct GatedTimer {
    gate: Semaphore,
}

#[allow(dead_code)]
impl GatedTimer {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
        }
    }

    /// Let one pending (or future) wait complete
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ThinkingTimer for GatedTimer {
    async fn wait(&self) {
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Author, NodeConfiguration, NodeKind, NodeStatus, Position};
    use crate::runtime::{spawn_session, SessionEvent, SessionHandle, SessionManager};
    use crate::state_machine::{DialoguePhase, SessionState};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::broadcast;

    async fn wait_until(handle: &SessionHandle, ready: impl Fn(&SessionState) -> bool) {
        let mut rx = handle.watch();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|state| ready(state)))
            .await
            .expect("timed out waiting for session state")
            .expect("session runtime stopped");
    }

    async fn created_session(prompt: &str) -> SessionHandle {
        let handle = spawn_session("test-session", Arc::new(ImmediateTimer));
        assert!(handle.create_from_prompt(prompt).await.unwrap());
        wait_until(&handle, |s| s.pipeline.is_some() && !s.busy).await;
        handle
    }

    fn node_id(handle: &SessionHandle, kind: NodeKind) -> String {
        handle.pipeline().unwrap().node_of_kind(kind).unwrap().id.clone()
    }

    async fn next_event(rx: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("broadcast closed")
    }

    #[tokio::test]
    async fn test_create_from_prompt_with_immediate_timer() {
        let handle = created_session("Connect Shopify to BigQuery").await;

        let pipeline = handle.pipeline().unwrap();
        assert_eq!(pipeline.nodes.len(), 3);
        assert_eq!(pipeline.edges.len(), 2);
        assert_eq!(handle.transcript().len(), 2);
        assert!(!handle.is_busy());
        assert_eq!(handle.snapshot().phase, Some(DialoguePhase::AwaitingSource));
    }

    #[tokio::test]
    async fn test_busy_until_thinking_elapses() {
        let timer = Arc::new(GatedTimer::new());
        let handle = spawn_session("gated", Arc::clone(&timer));

        assert!(handle.create_from_prompt("Get PostgreSQL users").await.unwrap());
        assert!(handle.is_busy());
        assert!(handle.pipeline().is_none());

        timer.release();
        wait_until(&handle, |s| !s.busy).await;
        assert_eq!(
            handle.pipeline().unwrap().description,
            "Get PostgreSQL users"
        );
    }

    #[tokio::test]
    async fn test_reset_cancels_thinking() {
        let timer = Arc::new(GatedTimer::new());
        let handle = spawn_session("cancel", Arc::clone(&timer));

        assert!(handle.create_from_prompt("first").await.unwrap());
        assert!(handle.reset().await.unwrap());
        assert!(!handle.is_busy());

        timer.release();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.pipeline().is_none());
        assert!(handle.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_latest_prompt_wins() {
        let timer = Arc::new(GatedTimer::new());
        let handle = spawn_session("supersede", Arc::clone(&timer));

        assert!(handle.create_from_prompt("first").await.unwrap());
        assert!(handle.create_from_prompt("second").await.unwrap());
        timer.release();
        timer.release();

        wait_until(&handle, |s| s.pipeline.is_some()).await;
        assert_eq!(handle.pipeline().unwrap().description, "second");
        assert!(!handle.is_busy());
    }

    #[tokio::test]
    async fn test_full_dialogue_through_handle() {
        let handle = created_session("Connect Shopify to BigQuery").await;

        for text in ["Shopify", "keep paid orders", "BigQuery"] {
            assert!(handle.process_user_input(text).await.unwrap());
        }

        let pipeline = handle.pipeline().unwrap();
        let statuses: Vec<NodeStatus> = pipeline.nodes.iter().map(|n| n.status).collect();
        assert_eq!(
            statuses,
            vec![NodeStatus::Partial, NodeStatus::Partial, NodeStatus::Complete]
        );
        assert_eq!(handle.transcript().len(), 8);

        assert!(handle.process_user_input("is it done?").await.unwrap());
        assert_eq!(handle.pipeline().unwrap(), pipeline);
        let transcript = handle.transcript();
        assert_eq!(transcript.len(), 10);
        assert_eq!(transcript[8].author, Author::User);
        assert_eq!(transcript[9].author, Author::Assistant);
    }

    #[tokio::test]
    async fn test_subscribers_see_events_in_order() {
        let handle = created_session("p").await;
        let mut rx = handle.subscribe();

        assert!(handle.process_user_input("Shopify").await.unwrap());

        match next_event(&mut rx).await {
            SessionEvent::Message { message } => {
                assert_eq!(message.author, Author::User);
                assert_eq!(message.content, "Shopify");
            }
            other => panic!("Expected user message, got {other:?}"),
        }
        match next_event(&mut rx).await {
            SessionEvent::Diagram { diagram } => {
                assert_eq!(diagram.nodes[0].label, "Shopify");
                assert_eq!(diagram.nodes[0].status_color, "blue");
            }
            other => panic!("Expected diagram, got {other:?}"),
        }
        match next_event(&mut rx).await {
            SessionEvent::Message { message } => assert_eq!(message.author, Author::Assistant),
            other => panic!("Expected assistant message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_and_creation_broadcast_snapshots() {
        let handle = created_session("p").await;
        let mut rx = handle.subscribe();

        assert!(handle.reset().await.unwrap());
        match next_event(&mut rx).await {
            SessionEvent::Snapshot { snapshot } => {
                assert!(snapshot.pipeline.is_none());
                assert!(snapshot.transcript.is_empty());
                assert_eq!(snapshot.phase, None);
            }
            other => panic!("Expected snapshot after reset, got {other:?}"),
        }

        assert!(handle.create_from_prompt("again").await.unwrap());
        match next_event(&mut rx).await {
            SessionEvent::Busy { busy } => assert!(busy),
            other => panic!("Expected busy, got {other:?}"),
        }
        match next_event(&mut rx).await {
            SessionEvent::Snapshot { snapshot } => {
                assert_eq!(snapshot.pipeline.unwrap().description, "again");
                assert!(!snapshot.busy);
            }
            other => panic!("Expected snapshot after creation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inspection_commands() {
        let handle = created_session("p").await;
        let source = node_id(&handle, NodeKind::Source);

        assert!(handle.select_node(Some(source.clone())).await.unwrap());
        assert_eq!(handle.selected_node_id(), Some(source.clone()));

        let mut configuration = NodeConfiguration::new();
        configuration.insert("description".to_string(), Value::from("orders feed"));
        assert!(handle
            .update_node_configuration(source.clone(), configuration.clone())
            .await
            .unwrap());
        assert!(handle
            .update_node_status(source.clone(), NodeStatus::Error)
            .await
            .unwrap());
        assert!(handle
            .update_node_position(source.clone(), Position { x: 5.0, y: 6.0 })
            .await
            .unwrap());

        let pipeline = handle.pipeline().unwrap();
        let node = pipeline.node(&source).unwrap();
        assert_eq!(node.configuration, configuration);
        assert_eq!(node.status, NodeStatus::Error);
        assert_eq!(node.position, Position { x: 5.0, y: 6.0 });
    }

    #[tokio::test]
    async fn test_missing_targets_are_not_applied() {
        let handle = spawn_session("empty", Arc::new(ImmediateTimer));

        assert!(!handle
            .update_node_status("nope", NodeStatus::Complete)
            .await
            .unwrap());
        assert!(!handle.process_user_input("Shopify").await.unwrap());
        assert!(!handle.create_from_prompt("   ").await.unwrap());
        assert_eq!(handle.state(), SessionState::default());
    }

    #[tokio::test]
    async fn test_queries_are_idempotent() {
        let handle = created_session("p").await;
        assert!(handle.process_user_input("Shopify").await.unwrap());

        assert_eq!(handle.snapshot(), handle.snapshot());
        assert_eq!(handle.transcript(), handle.transcript());
        assert_eq!(handle.pipeline(), handle.pipeline());
    }

    #[tokio::test]
    async fn test_reset_then_create_behaves_like_first_use() {
        let handle = created_session("Analyze Stripe payments").await;
        let first_contents: Vec<String> =
            handle.transcript().into_iter().map(|m| m.content).collect();

        assert!(handle.process_user_input("Stripe").await.unwrap());
        assert!(handle.reset().await.unwrap());
        assert!(handle.pipeline().is_none());
        assert!(handle.transcript().is_empty());
        assert_eq!(handle.selected_node_id(), None);

        assert!(handle
            .create_from_prompt("Analyze Stripe payments")
            .await
            .unwrap());
        wait_until(&handle, |s| s.pipeline.is_some()).await;

        let contents: Vec<String> = handle.transcript().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, first_contents);
        assert!(handle
            .pipeline()
            .unwrap()
            .nodes
            .iter()
            .all(|n| n.status == NodeStatus::Pending));
    }

    #[tokio::test]
    async fn test_manager_tracks_sessions() {
        let manager = SessionManager::new(Arc::new(ImmediateTimer));
        let handle = manager.create_session().await;
        let id = handle.session_id().to_string();

        let found = manager.get(&id).await.unwrap();
        assert_eq!(found.session_id(), id);

        manager.remove(&id).await.unwrap();
        assert!(manager.get(&id).await.is_err());
        assert!(manager.remove(&id).await.is_err());
    }
}
