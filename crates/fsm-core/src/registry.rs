use std::collections::HashMap;

use crate::error::FsmError;
use crate::state::StateDefinition;

/// Mapping from state key to definition. Populated at configuration time
/// and read-only once the machine starts stepping.
///
/// Registering a key twice replaces the earlier definition silently,
/// matching map-insert semantics.
pub struct StateRegistry<A> {
    states: HashMap<String, StateDefinition<A>>,
}

impl<A> StateRegistry<A> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    pub fn register(&mut self, definition: StateDefinition<A>) {
        let key = definition.key().to_string();
        if self.states.insert(key.clone(), definition).is_some() {
            log::debug!("state '{}' re-registered, previous definition replaced", key);
        }
    }

    pub fn lookup(&self, key: &str) -> Result<&StateDefinition<A>, FsmError> {
        self.states
            .get(key)
            .ok_or_else(|| FsmError::UnknownState(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.states.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check that the initial key, the terminal key, and every declared
    /// transition target resolve through `lookup`. A dangling reference is
    /// a configuration error, never silently dropped.
    pub fn validate(&self, initial: &str, terminal: &str) -> Result<(), FsmError> {
        self.lookup(initial)?;
        self.lookup(terminal)?;
        for definition in self.states.values() {
            for transition in definition.transitions() {
                if !self.contains(&transition.target) {
                    return Err(FsmError::UnknownState(format!(
                        "{} (referenced by transition from '{}')",
                        transition.target,
                        definition.key()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<A> Default for StateRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(key: &str) -> StateDefinition<()> {
        StateDefinition::new(key, format!("prompt for {}", key))
    }

    #[test]
    fn lookup_of_an_unregistered_key_fails() {
        let registry: StateRegistry<()> = StateRegistry::new();
        let err = registry.lookup("MISSING").unwrap_err();
        assert!(matches!(err, FsmError::UnknownState(key) if key == "MISSING"));
    }

    #[test]
    fn redefining_a_state_replaces_the_earlier_definition() {
        let mut registry = StateRegistry::new();
        registry.register(definition("START"));
        registry.register(StateDefinition::<()>::new("START", "second prompt"));

        assert_eq!(registry.len(), 1);
        let looked_up = registry.lookup("START").unwrap();
        assert_eq!(looked_up.prompt_template(), "second prompt");
    }

    #[test]
    fn validate_accepts_a_closed_transition_graph() {
        let mut registry = StateRegistry::new();
        registry.register(
            StateDefinition::<()>::new("START", "p").transition("END", "user wants to quit"),
        );
        registry.register(definition("END"));

        assert!(registry.validate("START", "END").is_ok());
    }

    #[test]
    fn validate_rejects_a_dangling_transition_target() {
        let mut registry = StateRegistry::new();
        registry.register(
            StateDefinition::<()>::new("START", "p").transition("MISSING", "goes nowhere"),
        );
        registry.register(definition("END"));

        let err = registry.validate("START", "END").unwrap_err();
        assert!(matches!(err, FsmError::UnknownState(msg) if msg.contains("MISSING")));
    }

    #[test]
    fn validate_rejects_unregistered_initial_and_terminal_keys() {
        let mut registry = StateRegistry::new();
        registry.register(definition("START"));

        assert!(registry.validate("NOPE", "START").is_err());
        assert!(registry.validate("START", "NOPE").is_err());
    }
}
