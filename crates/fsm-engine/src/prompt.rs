use std::collections::HashMap;

use fsm_core::{ConversationContext, Role, StateDefinition};
use fsm_llm::{ChatMessage, CompletionRequest};

use crate::config::EngineConfig;

/// Instruction appended to every system message so the transition decision
/// comes back in a machine-parseable shape instead of free text.
const DECISION_INSTRUCTION: &str = "\
Reply with a single JSON object and nothing else, in this exact shape:
{\"response\": \"<what you say to the user>\", \"transition\": \"<STATE_KEY>\"}
Set \"transition\" to one of the state keys listed above only when its \
condition is met by the user's latest message. Otherwise set \"transition\" \
to null and stay in the current state.";

/// Renders one outbound query: the current state's prompt template (with
/// `{placeholder}` substitution), the transition menu, the decision-format
/// instruction, the windowed conversation history, and the pending user turn.
pub struct PromptBuilder<'a> {
    config: &'a EngineConfig,
    vars: &'a HashMap<String, String>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(config: &'a EngineConfig, vars: &'a HashMap<String, String>) -> Self {
        Self { config, vars }
    }

    pub fn build<A>(
        &self,
        definition: &StateDefinition<A>,
        context: &ConversationContext,
        user_input: &str,
    ) -> CompletionRequest {
        let mut messages = vec![ChatMessage::system(self.system_message(definition))];
        for entry in context.recent(self.config.history_window) {
            messages.push(match entry.role {
                Role::User => ChatMessage::user(&entry.content),
                Role::Assistant => ChatMessage::assistant(&entry.content),
            });
        }
        messages.push(ChatMessage::user(user_input));

        CompletionRequest {
            messages,
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            json_response: true,
        }
    }

    fn system_message<A>(&self, definition: &StateDefinition<A>) -> String {
        let mut out = render_template(definition.prompt_template(), self.vars);
        if definition.is_terminal() {
            out.push_str("\n\nThis state has no outgoing transitions.");
        } else {
            out.push_str("\n\nYou may move the conversation to one of these states:\n");
            for transition in definition.transitions() {
                out.push_str(&format!("- {}: {}\n", transition.target, transition.description));
            }
        }
        out.push('\n');
        out.push_str(DECISION_INSTRUCTION);
        out
    }
}

/// Substitute `{name}` placeholders from the vars map. Placeholders without
/// a matching var are left in place.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsm_core::HistoryEntry;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn render_template_substitutes_known_placeholders() {
        let rendered = render_template(
            "Present the content for topic {topic_id}.",
            &vars(&[("topic_id", "7")]),
        );
        assert_eq!(rendered, "Present the content for topic 7.");
    }

    #[test]
    fn render_template_leaves_unknown_placeholders_alone() {
        let rendered = render_template("Hello {missing}", &vars(&[]));
        assert_eq!(rendered, "Hello {missing}");
    }

    #[test]
    fn system_message_lists_every_declared_transition() {
        let definition: StateDefinition<()> = StateDefinition::new("START", "You are a tutor.")
            .transition("QUIZ", "If the user should take a quiz")
            .transition("END", "If the user wants to quit");
        let config = EngineConfig::default();
        let empty = HashMap::new();
        let builder = PromptBuilder::new(&config, &empty);

        let system = builder.system_message(&definition);
        assert!(system.contains("- QUIZ: If the user should take a quiz"));
        assert!(system.contains("- END: If the user wants to quit"));
        assert!(system.contains("single JSON object"));
    }

    #[test]
    fn terminal_states_advertise_no_transitions() {
        let definition: StateDefinition<()> = StateDefinition::new("END", "Goodbye!");
        let config = EngineConfig::default();
        let empty = HashMap::new();
        let builder = PromptBuilder::new(&config, &empty);

        let system = builder.system_message(&definition);
        assert!(system.contains("no outgoing transitions"));
    }

    #[test]
    fn build_windows_history_and_appends_the_pending_user_turn() {
        let definition: StateDefinition<()> =
            StateDefinition::new("START", "prompt").transition("END", "quit");
        let config = EngineConfig {
            history_window: Some(2),
            ..Default::default()
        };
        let empty = HashMap::new();
        let builder = PromptBuilder::new(&config, &empty);

        let mut context = ConversationContext::new("START");
        for i in 0..4 {
            context.add_entry(HistoryEntry::user(format!("turn {}", i), "START"));
        }

        let request = builder.build(&definition, &context, "latest");
        // system + 2 windowed entries + pending user input
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[1].content, "turn 2");
        assert_eq!(request.messages[3].content, "latest");
        assert!(request.json_response);
    }
}
