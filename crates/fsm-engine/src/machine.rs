use std::collections::HashMap;

use fsm_core::{
    ConversationContext, FsmError, FsmRunResult, HistoryEntry, StateDefinition, StateRegistry,
    StepView,
};
use fsm_llm::ModelClient;

use crate::config::EngineConfig;
use crate::prompt::{render_template, PromptBuilder};
use crate::resolver;

/// One conversational state machine: registry, conversation context, and a
/// caller-injected application context `A` that state handlers may mutate.
///
/// Not safe for concurrent stepping: a second `run_step` must not be issued
/// before the first completes. Independent machines (separate instances)
/// may run concurrently.
pub struct StateMachine<A> {
    registry: StateRegistry<A>,
    context: ConversationContext,
    config: EngineConfig,
    template_vars: HashMap<String, String>,
    initial_state: String,
    terminal_state: String,
    validated: bool,
    app: A,
}

impl<A: Send> StateMachine<A> {
    pub fn new(
        initial_state: impl Into<String>,
        terminal_state: impl Into<String>,
        app: A,
    ) -> Self {
        let initial_state = initial_state.into();
        Self {
            registry: StateRegistry::new(),
            context: ConversationContext::new(initial_state.clone()),
            config: EngineConfig::default(),
            template_vars: HashMap::new(),
            initial_state,
            terminal_state: terminal_state.into(),
            validated: false,
            app,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a state. Re-registering a key replaces the earlier
    /// definition.
    pub fn define_state(&mut self, definition: StateDefinition<A>) {
        self.validated = false;
        self.registry.register(definition);
    }

    /// Set a `{name}` substitution used when rendering prompt templates.
    pub fn set_template_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.template_vars.insert(name.into(), value.into());
    }

    pub fn current_state(&self) -> &str {
        &self.context.current_state
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// True iff the current state is the configured terminal state.
    pub fn is_completed(&self) -> bool {
        self.context.current_state == self.terminal_state
    }

    pub fn conversation(&self) -> &ConversationContext {
        &self.context
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.context.history
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Caller-driven escape hatch, e.g. jumping to the terminal state on a
    /// user "quit". The key must be registered; declared edges are not
    /// required for a forced move.
    pub fn force_set_state(&mut self, key: &str) -> Result<(), FsmError> {
        self.registry.lookup(key)?;
        log::info!(
            "[{}] state forced '{}' -> '{}'",
            self.context.id,
            self.context.current_state,
            key
        );
        self.context.set_state(key);
        Ok(())
    }

    /// Check that the initial key, the terminal key, and every declared
    /// transition target are registered. Runs lazily before the first step;
    /// success is cached until the registry changes.
    pub fn validate(&mut self) -> Result<(), FsmError> {
        if !self.validated {
            self.registry
                .validate(&self.initial_state, &self.terminal_state)?;
            self.validated = true;
        }
        Ok(())
    }

    /// Run one step: build the query, ask the model, resolve the transition,
    /// run the current state's handler, and advance the conversation.
    ///
    /// The context is mutated only after the model call succeeds, so a
    /// failed, cancelled, or timed-out call leaves the conversation exactly
    /// as it was. Once the machine is terminal the model is never invoked
    /// again and the history stops growing; repeated calls return the same
    /// terminal result, though the terminal state's handler runs on each
    /// call and any side effects it has on the app context repeat with it.
    pub async fn run_step(
        &mut self,
        client: &dyn ModelClient,
        user_input: impl Into<String>,
    ) -> Result<FsmRunResult, FsmError> {
        let user_input = user_input.into();
        self.validate()?;

        if self.is_completed() {
            return self.terminal_result().await;
        }

        let current_key = self.context.current_state.clone();
        let definition = self.registry.lookup(&current_key)?;

        let request = PromptBuilder::new(&self.config, &self.template_vars).build(
            definition,
            &self.context,
            &user_input,
        );

        log::debug!(
            "[{}] querying model from state '{}' ({} messages)",
            self.context.id,
            current_key,
            request.messages.len()
        );
        let reply = client
            .complete(request)
            .await
            .map_err(|e| FsmError::Inference(e.to_string()))?;

        let decision = resolver::resolve(&reply, definition, &current_key);

        let mut response = decision.response.clone();
        if let Some(handler) = definition.handler_ref() {
            let step = StepView {
                response: &decision.response,
                transitioned: decision.transitioned,
                current_state: &current_key,
                next_state: &decision.next_state,
            };
            if let Some(overridden) = handler.on_step(&mut self.app, step).await {
                response = overridden;
            }
        }

        // All mutation happens after the suspension point has resolved.
        self.context
            .add_entry(HistoryEntry::user(&user_input, &current_key));
        self.context
            .add_entry(HistoryEntry::assistant(&response, &current_key));
        if decision.transitioned {
            log::info!(
                "[{}] transition '{}' -> '{}'",
                self.context.id,
                current_key,
                decision.next_state
            );
            self.context.set_state(decision.next_state.clone());
        }

        Ok(FsmRunResult {
            response,
            state: self.context.current_state.clone(),
            transitioned: decision.transitioned,
        })
    }

    /// Terminal short-circuit: render the terminal prompt, let its handler
    /// have the last word, touch nothing else.
    async fn terminal_result(&mut self) -> Result<FsmRunResult, FsmError> {
        let key = self.context.current_state.clone();
        let definition = self.registry.lookup(&key)?;
        let rendered = render_template(definition.prompt_template(), &self.template_vars);

        let mut response = rendered.clone();
        if let Some(handler) = definition.handler_ref() {
            let step = StepView {
                response: &rendered,
                transitioned: false,
                current_state: &key,
                next_state: &key,
            };
            if let Some(overridden) = handler.on_step(&mut self.app, step).await {
                response = overridden;
            }
        }

        Ok(FsmRunResult {
            response,
            state: key,
            transitioned: false,
        })
    }
}
