use serde::{Deserialize, Serialize};

/// Outcome of mapping a model reply onto the current state's transition
/// table. `next_state` equals the current key when no transition occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionDecision {
    pub next_state: String,
    pub transitioned: bool,
    pub response: String,
}

/// Externally visible result of one run step. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FsmRunResult {
    pub response: String,
    pub state: String,
    pub transitioned: bool,
}
