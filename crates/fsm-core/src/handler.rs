use async_trait::async_trait;

/// Read-only view of one resolved step, handed to the current state's handler.
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    /// Free-text portion of the model's reply.
    pub response: &'a str,
    /// Whether the machine will move to a different state after this step.
    pub transitioned: bool,
    /// State the step ran in.
    pub current_state: &'a str,
    /// State the machine will be in after the step. Equal to
    /// `current_state` when no transition occurs.
    pub next_state: &'a str,
}

/// Per-state application logic, invoked after the transition decision is
/// resolved and before the step result is produced.
///
/// Handlers receive the caller-injected application context `A` and may
/// mutate it. Returning `Some(text)` overrides the user-visible response;
/// returning `None` keeps the model's text. Side effects on `A` are the
/// caller's responsibility and are not inspected by the engine.
#[async_trait]
pub trait StateHandler<A>: Send + Sync {
    async fn on_step(&self, app: &mut A, step: StepView<'_>) -> Option<String>;
}

/// Adapter turning a plain closure into a [`StateHandler`].
pub struct FnHandler<F>(F);

/// Wrap a synchronous closure as a state handler. Annotate the application
/// context parameter so inference can pin down `A`:
/// `handler_fn(|light: &mut Light, step| ...)`.
pub fn handler_fn<A, F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut A, StepView<'_>) -> Option<String> + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<A, F> StateHandler<A> for FnHandler<F>
where
    A: Send,
    F: Fn(&mut A, StepView<'_>) -> Option<String> + Send + Sync,
{
    async fn on_step(&self, app: &mut A, step: StepView<'_>) -> Option<String> {
        (self.0)(app, step)
    }
}
