/// Configuration for the run engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Number of most-recent history entries included in each prompt.
    /// `None` (the default) sends the full history; for long conversations
    /// that grows the token cost of every step without bound, so callers
    /// with open-ended sessions should set a window.
    pub history_window: Option<usize>,
    /// Model override forwarded to the client on every request.
    pub model: Option<String>,
    /// Sampling temperature forwarded to the client.
    pub temperature: Option<f32>,
}
