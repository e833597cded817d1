//! Run engine for LLM-driven conversational state machines.
//!
//! A machine is a finite set of named states, each with a prompt template
//! and a table of declared transitions. Each step builds one model query,
//! maps the model's reply deterministically onto a legal transition (or
//! onto "stay in place"), runs the current state's handler, and advances
//! the conversation.

pub mod config;
pub mod machine;
pub mod prompt;
pub mod resolver;

pub use config::EngineConfig;
pub use machine::StateMachine;
pub use prompt::PromptBuilder;

pub use fsm_core::{
    handler_fn, ConversationContext, FsmError, FsmRunResult, HistoryEntry, Role, StateDefinition,
    StateHandler, StepView, Transition, TransitionDecision,
};
