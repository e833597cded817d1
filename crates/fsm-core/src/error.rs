use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsmError {
    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Inference error: {0}")]
    Inference(String),
}
