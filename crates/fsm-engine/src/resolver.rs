use fsm_core::{StateDefinition, TransitionDecision};
use serde::Deserialize;

/// Wire shape the model is asked to produce.
#[derive(Debug, Deserialize)]
struct DecisionPayload {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    transition: Option<String>,
}

/// Map a raw model reply onto the current state's transition table.
///
/// Anything about the reply's content degrades gracefully: a reply that is
/// not a decision payload, or that names a target not declared on the
/// current state (even one registered elsewhere in the machine), keeps the
/// machine in place with `transitioned = false`. Only declared edges are
/// legal, never global ones.
pub fn resolve<A>(
    reply: &str,
    definition: &StateDefinition<A>,
    current_state: &str,
) -> TransitionDecision {
    let payload = match parse_payload(reply) {
        Some(payload) => payload,
        None => {
            log::warn!(
                "model reply did not parse as a decision, staying in '{}'",
                current_state
            );
            return stay(current_state, reply.trim().to_string());
        }
    };

    let response = payload.response.unwrap_or_default();
    match payload.transition {
        Some(target) if target == current_state => {
            // Degenerate self-transition: legal, but a no-op for the caller.
            stay(current_state, response)
        }
        Some(target) => {
            if definition.transition_to(&target).is_some() {
                TransitionDecision {
                    next_state: target,
                    transitioned: true,
                    response,
                }
            } else {
                log::warn!(
                    "model chose '{}', not a declared transition from '{}'",
                    target,
                    current_state
                );
                stay(current_state, response)
            }
        }
        None => stay(current_state, response),
    }
}

fn stay(current_state: &str, response: String) -> TransitionDecision {
    TransitionDecision {
        next_state: current_state.to_string(),
        transitioned: false,
        response,
    }
}

fn parse_payload(reply: &str) -> Option<DecisionPayload> {
    let trimmed = strip_code_fence(reply.trim());
    let payload: DecisionPayload = serde_json::from_str(trimmed).ok()?;
    if payload.response.is_none() && payload.transition.is_none() {
        // Parsed as JSON but carries neither field; treat as free text.
        return None;
    }
    Some(payload)
}

/// Models occasionally wrap the JSON payload in a markdown code fence
/// despite the instruction not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.trim().strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => text,
    }
}
