//! HTTP API for the flow builder
//!
//! Exposes session queries and commands to the diagram and transcript
//! front ends.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{SessionManager, ThinkingTimer};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(timer: Arc<dyn ThinkingTimer>) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(timer)),
        }
    }
}
