//! Conversation/flow state machine
//!
//! Follows the Elm Architecture: `transition` maps the current session state
//! and an event to a new state plus effects, and the runtime executes the
//! effects.

mod effect;
pub mod event;
mod script;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{DialoguePhase, SessionState};
pub use transition::transition;
#[allow(unused_imports)] // Public API re-exports
pub use state::Intent;
#[allow(unused_imports)] // Public API re-exports
pub use transition::TransitionError;
