//! Light-switch agent: the model decides when to flip the switch.
//!
//! Requires `OPENAI_API_KEY` in the environment. Type "quit" to end the
//! conversation early.

use std::error::Error;
use std::io::{self, BufRead, Write};

use fsm_engine::{handler_fn, StateDefinition, StateMachine};
use fsm_llm::OpenAiClient;

#[derive(Default)]
struct Light {
    on: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let api_key = std::env::var("OPENAI_API_KEY")?;
    let client = OpenAiClient::new(api_key);

    let mut machine = StateMachine::new("START", "END", Light::default());
    machine.define_state(
        StateDefinition::new(
            "START",
            "You are a light switch assistant. Ask the user whether they want \
             to turn on the light.",
        )
        .transition("STATE_ON", "If user wants to turn on the light")
        .transition("END", "If user wants to end the conversation")
        .handler(handler_fn(|light: &mut Light, step| {
            if step.transitioned && step.next_state == "STATE_ON" {
                light.on = true;
                println!("[light turned ON]");
            }
            None
        })),
    );
    machine.define_state(
        StateDefinition::new(
            "STATE_ON",
            "The light is now on. Ask the user if they want to turn it off \
             or end the conversation.",
        )
        .transition("START", "If user wants to turn off the light")
        .transition("END", "If user wants to end the conversation")
        .handler(handler_fn(|light: &mut Light, step| {
            if step.transitioned && step.next_state == "START" {
                light.on = false;
                println!("[light turned OFF]");
            }
            None
        })),
    );
    machine.define_state(
        StateDefinition::new("END", "Goodbye!")
            .handler(handler_fn(|_: &mut Light, _| Some("Goodbye!".to_string()))),
    );

    println!("Agent: Hello! I am your light switch assistant.");
    let stdin = io::stdin();
    while !machine.is_completed() {
        print!("You: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            machine.force_set_state("END")?;
            println!("Agent: Goodbye!");
            break;
        }

        let result = machine.run_step(&client, input).await?;
        println!("Agent: {}", result.response);
    }

    println!("[light is {}]", if machine.app().on { "ON" } else { "OFF" });
    Ok(())
}
