pub mod context;
pub mod error;
pub mod handler;
pub mod registry;
pub mod state;
pub mod types;

pub use context::{ConversationContext, HistoryEntry, Role};
pub use error::FsmError;
pub use handler::{handler_fn, FnHandler, StateHandler, StepView};
pub use registry::StateRegistry;
pub use state::{StateDefinition, Transition};
pub use types::{FsmRunResult, TransitionDecision};
