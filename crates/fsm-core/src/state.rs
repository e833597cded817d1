use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::handler::StateHandler;

/// A directed, labeled edge out of a state. The description is shown to the
/// model as the natural-language trigger for taking this edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transition {
    pub target: String,
    pub description: String,
}

/// One named point in the conversation: a prompt template, the declared
/// outgoing transitions (in declaration order), and optional handler logic.
///
/// A state with no transitions is terminal.
pub struct StateDefinition<A> {
    key: String,
    prompt_template: String,
    transitions: Vec<Transition>,
    handler: Option<Arc<dyn StateHandler<A>>>,
}

impl<A> StateDefinition<A> {
    pub fn new(key: impl Into<String>, prompt_template: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            prompt_template: prompt_template.into(),
            transitions: Vec::new(),
            handler: None,
        }
    }

    /// Declare an outgoing transition. Re-declaring an existing target
    /// replaces its description in place, keeping the original position.
    pub fn transition(
        mut self,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let target = target.into();
        let description = description.into();
        if let Some(existing) = self.transitions.iter_mut().find(|t| t.target == target) {
            existing.description = description;
        } else {
            self.transitions.push(Transition {
                target,
                description,
            });
        }
        self
    }

    pub fn handler(mut self, handler: impl StateHandler<A> + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Look up a declared transition by target key.
    pub fn transition_to(&self, target: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.target == target)
    }

    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn handler_ref(&self) -> Option<&Arc<dyn StateHandler<A>>> {
        self.handler.as_ref()
    }
}

impl<A> Clone for StateDefinition<A> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            prompt_template: self.prompt_template.clone(),
            transitions: self.transitions.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<A> fmt::Debug for StateDefinition<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("key", &self.key)
            .field("prompt_template", &self.prompt_template)
            .field("transitions", &self.transitions)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
